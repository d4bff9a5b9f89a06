//! Core drawing-surface model for sketchroom.
//!
//! This crate owns everything that does not touch pixels or the network:
//! the scene model (stroke history + element collection), the shape
//! factory, hit-testing geometry, and the pointer-driven interaction
//! state machine. Rendering lives in `sketchroom-render` and room sync
//! in `sketchroom-sync`; both consume this crate through the scene's
//! dirty flag and revision counter.

pub mod color;
pub mod element;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod scene;
pub mod stroke;
pub mod tools;

pub use color::Color;
pub use element::{create_element, Element, ElementId, ElementKind};
pub use error::ModelError;
pub use geometry::{
    cursor_for_position, hit_test, midpoint, point_to_segment_dist, resized_coordinates, Bounds,
    CursorHint, HitPosition, DEFAULT_HIT_TOLERANCE,
};
pub use interaction::{InteractionController, InteractionState, Selection};
pub use scene::{SceneModel, DEFAULT_ERASE_RADIUS};
pub use stroke::{Stroke, StrokePoint};
pub use tools::{ToolConfig, ToolKind, BRUSH_OPACITY};
