//! Drawing surface abstraction.

use kurbo::BezPath;
use sketchroom_core::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("snapshot decoding failed: {0}")]
    Decode(#[from] png::DecodingError),
    #[error("unsupported image data: {0}")]
    Unsupported(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// A mutable pixel target the renderer paints onto.
///
/// The renderer only ever repaints whole frames, so the trait is small:
/// clear, stroke a path, blit an image, export. Implementations own the
/// pixel representation.
pub trait DrawSurface {
    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Fill the whole surface with one color.
    fn clear(&mut self, color: Color);

    /// Stroke a path outline with the given color, line width and opacity.
    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64, opacity: f64);

    /// Blit RGBA8 pixel data at the surface origin, clipped to the surface.
    fn draw_image(&mut self, rgba: &[u8], width: u32, height: u32) -> RenderResult<()>;

    /// Encode the current pixels as a PNG blob.
    fn export_png(&self) -> RenderResult<Vec<u8>>;
}
