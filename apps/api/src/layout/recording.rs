//! A `Renderer` that records draw calls instead of producing pixels.

use crate::layout::block::{Emphasis, ImageData, Rgb, TextStyle};
use crate::layout::font_metrics::get_metrics;
use crate::layout::renderer::{RenderError, Renderer};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Text {
        page: usize,
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
    Rect {
        page: usize,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
        radius: f32,
    },
    Image {
        page: usize,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
    AddPage {
        new_page: usize,
    },
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Vec<DrawCall>,
    page: usize,
    reject_images: bool,
    fail_text: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `draw_image` fails with an asset error.
    pub fn rejecting_images() -> Self {
        Self {
            reject_images: true,
            ..Self::default()
        }
    }

    /// Every `draw_text` fails with a draw error.
    pub fn failing_text() -> Self {
        Self {
            fail_text: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn page_count(&self) -> usize {
        self.page + 1
    }

    pub fn texts_on_page(&self, page: usize) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { page: p, text, .. } if *p == page => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn measure_wrapped_lines(
        &self,
        text: &str,
        font_size: f32,
        emphasis: Emphasis,
        max_width: f32,
    ) -> Vec<String> {
        get_metrics(emphasis).wrap(text, font_size, max_width)
    }

    fn text_width(&self, text: &str, font_size: f32, emphasis: Emphasis) -> f32 {
        get_metrics(emphasis).width_mm(text, font_size)
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) -> Result<(), RenderError> {
        if self.fail_text {
            return Err(RenderError::Draw("text rendering disabled".to_string()));
        }
        self.calls.push(DrawCall::Text {
            page: self.page,
            text: text.to_string(),
            x,
            y,
            style,
        });
        Ok(())
    }

    fn draw_filled_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
        corner_radius: f32,
    ) -> Result<(), RenderError> {
        self.calls.push(DrawCall::Rect {
            page: self.page,
            x,
            y,
            w,
            h,
            color,
            radius: corner_radius,
        });
        Ok(())
    }

    fn draw_image(
        &mut self,
        _image: &ImageData,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> Result<(), RenderError> {
        if self.reject_images {
            return Err(RenderError::Asset("image rejected".to_string()));
        }
        self.calls.push(DrawCall::Image {
            page: self.page,
            x,
            y,
            w,
            h,
        });
        Ok(())
    }

    fn add_page(&mut self) -> Result<(), RenderError> {
        self.page += 1;
        self.calls.push(DrawCall::AddPage {
            new_page: self.page,
        });
        Ok(())
    }
}
