//! Freehand strokes: sampled points carrying their style.

use crate::color::Color;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// One sampled position along a freehand stroke, carrying the style that
/// was active when the stroke started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub pos: Point,
    pub color: Color,
    pub width: f64,
    pub opacity: f64,
}

impl StrokePoint {
    pub fn new(pos: Point, color: Color, width: f64, opacity: f64) -> Self {
        Self {
            pos,
            color,
            width,
            opacity,
        }
    }
}

/// One continuous freehand drawing motion.
///
/// Immutable once committed to the stroke history; the stroke in progress
/// lives in a separate buffer owned by the interaction controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<StrokePoint>,
}

impl Stroke {
    pub fn from_points(points: Vec<StrokePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether any sample lies within `tolerance` of the given point.
    pub fn contains_near(&self, point: Point, tolerance: f64) -> bool {
        self.points.iter().any(|p| {
            let dx = point.x - p.pos.x;
            let dy = point.y - p.pos.y;
            (dx * dx + dy * dy).sqrt() <= tolerance
        })
    }

    /// Bounding box of the sampled positions.
    pub fn bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::ZERO;
        }
        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;
        for p in &self.points {
            min_x = min_x.min(p.pos.x);
            min_y = min_y.min(p.pos.y);
            max_x = max_x.max(p.pos.x);
            max_y = max_y.max(p.pos.y);
        }
        Rect::new(min_x, min_y, max_x, max_y)
    }
}
