//! Page geometry and the flow cursor.
//!
//! All measurements are millimetres, origin at the top-left corner of the page,
//! y growing downward.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A4 portrait width in millimetres.
pub const A4_WIDTH_MM: f32 = 210.0;
/// A4 portrait height in millimetres.
pub const A4_HEIGHT_MM: f32 = 297.0;

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("page dimensions must be finite and positive (got {width} x {height})")]
    InvalidDimensions { width: f32, height: f32 },

    #[error("margin {margin} leaves no content area on a {width} x {height} page")]
    MarginTooLarge { width: f32, height: f32, margin: f32 },
}

/// Fixed page size plus a uniform margin on all four sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    width: f32,
    height: f32,
    margin: f32,
}

impl PageGeometry {
    /// Validates that the margin leaves a positive content box in both directions.
    pub fn new(width: f32, height: f32, margin: f32) -> Result<Self, GeometryError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(GeometryError::InvalidDimensions { width, height });
        }
        if !margin.is_finite() || margin < 0.0 || width - 2.0 * margin <= 0.0 || height - 2.0 * margin <= 0.0
        {
            return Err(GeometryError::MarginTooLarge {
                width,
                height,
                margin,
            });
        }
        Ok(Self {
            width,
            height,
            margin,
        })
    }

    /// A4 portrait with the given margin.
    pub fn a4(margin: f32) -> Result<Self, GeometryError> {
        Self::new(A4_WIDTH_MM, A4_HEIGHT_MM, margin)
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Height available between the top and bottom margins.
    pub fn content_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }

    /// Lowest y a block may reach before it must move to the next page.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margin
    }
}

/// Where the next block will be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub page_index: usize,
    pub y_offset: f32,
}

impl Cursor {
    pub fn top_of_first_page(geometry: &PageGeometry) -> Self {
        Self {
            page_index: 0,
            y_offset: geometry.margin(),
        }
    }

    /// Space left above the bottom margin on the current page.
    pub fn remaining(&self, geometry: &PageGeometry) -> f32 {
        geometry.bottom_limit() - self.y_offset
    }

    /// True when a box of `height` starting at the cursor would cross the bottom margin.
    pub fn overflows(&self, height: f32, geometry: &PageGeometry) -> bool {
        self.y_offset + height > geometry.bottom_limit()
    }

    pub fn next_page(&mut self, geometry: &PageGeometry) {
        self.page_index += 1;
        self.y_offset = geometry.margin();
    }

    /// Moves down by `amount`, never past the bottom margin.
    pub fn advance_clamped(&mut self, amount: f32, geometry: &PageGeometry) {
        self.y_offset = (self.y_offset + amount).min(geometry.bottom_limit());
    }
}
