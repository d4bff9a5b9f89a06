//! Full-redraw scene renderer.

use crate::surface::DrawSurface;
use kurbo::BezPath;
use sketchroom_core::geometry::midpoint;
use sketchroom_core::{Color, SceneModel, Stroke, StrokePoint};

/// Paints the whole scene onto a [`DrawSurface`], every frame, in a fixed
/// order: background, committed strokes, the stroke in progress, then
/// elements. There is no damage tracking; correctness comes from the
/// redraw being total.
#[derive(Debug, Clone)]
pub struct Renderer {
    background: Color,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            background: Color::white(),
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Repaint the full frame.
    ///
    /// `pending` is the uncommitted stroke buffer of an active sketching
    /// interaction, painted after the committed history so the user sees
    /// ink while still dragging.
    pub fn render(
        &self,
        scene: &SceneModel,
        pending: Option<&[StrokePoint]>,
        surface: &mut dyn DrawSurface,
    ) {
        surface.clear(self.background);

        for stroke in scene.strokes() {
            self.paint_points(&stroke.points, surface);
        }
        if let Some(points) = pending {
            self.paint_points(points, surface);
        }
        for element in scene.elements() {
            surface.stroke_path(
                element.path(),
                element.stroke_color,
                element.stroke_width,
                1.0,
            );
        }
    }

    /// Repaint only if the scene's dirty flag is set; consumes the flag.
    /// Returns whether a frame was painted.
    ///
    /// The flag tracks committed model changes only; an in-progress
    /// sketch lives in the controller's pending buffer and does not dirty
    /// the scene. Hosts that want live ink while the pointer is down
    /// should pass that buffer as `pending` and call [`render`](Self::render)
    /// directly each frame of the drag.
    pub fn render_if_dirty(
        &self,
        scene: &mut SceneModel,
        pending: Option<&[StrokePoint]>,
        surface: &mut dyn DrawSurface,
    ) -> bool {
        if !scene.take_dirty() {
            return false;
        }
        self.render(scene, pending, surface);
        true
    }

    fn paint_points(&self, points: &[StrokePoint], surface: &mut dyn DrawSurface) {
        let Some(first) = points.first() else {
            return;
        };
        surface.stroke_path(
            &smoothed_polyline(points),
            first.color,
            first.width,
            first.opacity,
        );
    }
}

/// Build a smoothed path through stroke samples.
///
/// Each sample becomes the control point of a quadratic segment ending at
/// the midpoint to the next sample, which rounds off the sampling jitter
/// of raw pointer events. A single sample degenerates to a dot.
pub fn smoothed_polyline(points: &[StrokePoint]) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };
    path.move_to(first.pos);
    if points.len() == 1 {
        path.line_to(first.pos);
        return path;
    }
    for pair in points.windows(2).skip(1) {
        path.quad_to(pair[0].pos, midpoint(pair[0].pos, pair[1].pos));
    }
    if let Some(last) = points.last() {
        path.line_to(last.pos);
    }
    path
}

/// Convenience wrapper around [`smoothed_polyline`] for committed strokes.
pub fn stroke_path(stroke: &Stroke) -> BezPath {
    smoothed_polyline(&stroke.points)
}
