//! Rendering for sketchroom: a full-redraw renderer, a surface trait, and
//! a software raster implementation used for snapshots and tests.

mod raster;
mod renderer;
mod surface;

pub use raster::{decode_png, PixelSurface};
pub use renderer::{smoothed_polyline, stroke_path, Renderer};
pub use surface::{DrawSurface, RenderError, RenderResult};
