//! The rendering capability the flow engine draws through.
//!
//! Coordinates are millimetres from the top-left corner of the current page, y growing
//! downward. For text, `y` is the top of the line box; implementations place the baseline.

use thiserror::Error;

use crate::layout::block::{Emphasis, ImageData, Rgb, TextStyle};

#[derive(Debug, Error)]
pub enum RenderError {
    /// An optional embedded asset could not be used. The engine skips it and carries on.
    #[error("asset could not be rendered: {0}")]
    Asset(String),

    #[error("draw call failed: {0}")]
    Draw(String),
}

/// Text measurement plus drawing primitives.
///
/// The renderer always has one open page; `add_page` finalises it and opens the next.
pub trait Renderer {
    /// Splits `text` into lines that fit `max_width` at `font_size` points.
    fn measure_wrapped_lines(
        &self,
        text: &str,
        font_size: f32,
        emphasis: Emphasis,
        max_width: f32,
    ) -> Vec<String>;

    /// Width of a single unwrapped line.
    fn text_width(&self, text: &str, font_size: f32, emphasis: Emphasis) -> f32;

    /// Draws one line of text. A `None` colour in `style` means black.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) -> Result<(), RenderError>;

    fn draw_filled_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Rgb,
        corner_radius: f32,
    ) -> Result<(), RenderError>;

    /// Fails with [`RenderError::Asset`] when the image data cannot be decoded.
    fn draw_image(&mut self, image: &ImageData, x: f32, y: f32, w: f32, h: f32)
        -> Result<(), RenderError>;

    fn add_page(&mut self) -> Result<(), RenderError>;
}
