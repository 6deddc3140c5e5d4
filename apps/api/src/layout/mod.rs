// Document flow layout.
// Blocks go in, draw calls come out through a `Renderer`; the engine itself does no I/O.
// Rendering is CPU-bound and runs inside tokio::task::spawn_blocking.

pub mod block;
pub mod engine;
pub mod font_metrics;
pub mod geometry;
#[cfg(test)]
pub mod recording;
pub mod renderer;

// Re-export the public API consumed by other modules (documents, render, routes).
pub use block::{ContentBlock, Emphasis, ImageData, Rgb, TextStyle};
pub use engine::{layout, LayoutSummary, Theme};
pub use geometry::PageGeometry;
pub use renderer::{RenderError, Renderer};
