//! Pure geometry helpers: midpoint interpolation, hit-testing,
//! resize-coordinate computation and coordinate normalization.

use crate::element::{Element, ElementKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Default tolerance band (in canvas units) for hit-testing shape geometry.
pub const DEFAULT_HIT_TOLERANCE: f64 = 10.0;

/// Anchor-and-free-corner coordinates of an element.
///
/// Not necessarily normalized (`x1 <= x2`) until the interaction that
/// produced them is released; call [`Bounds::adjusted`] to normalize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Bounds {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// The anchor corner.
    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    /// The free corner.
    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Normalize the coordinates for the given element kind.
    ///
    /// Rectangles and ellipses order the corners so `x1 <= x2` and
    /// `y1 <= y2`. Lines order their endpoints by x, then y, so the stored
    /// start is always the leftmost (or topmost for vertical lines) point.
    /// Idempotent.
    pub fn adjusted(&self, kind: ElementKind) -> Self {
        match kind {
            ElementKind::Line => {
                if self.x1 < self.x2 || (self.x1 == self.x2 && self.y1 <= self.y2) {
                    *self
                } else {
                    Self::new(self.x2, self.y2, self.x1, self.y1)
                }
            }
            ElementKind::Rectangle | ElementKind::Ellipse => Self::new(
                self.x1.min(self.x2),
                self.y1.min(self.y2),
                self.x1.max(self.x2),
                self.y1.max(self.y2),
            ),
        }
    }

    /// Check if a point falls inside the normalized box.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x1.min(self.x2)
            && point.x <= self.x1.max(self.x2)
            && point.y >= self.y1.min(self.y2)
            && point.y <= self.y1.max(self.y2)
    }

    /// Translate both corners by the same delta.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x1 + dx, self.y1 + dy, self.x2 + dx, self.y2 + dy)
    }
}

/// Which part of an element a point falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitPosition {
    /// Inside the element's box.
    Inside,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Near a line element's first endpoint.
    LineStart,
    /// Near a line element's second endpoint.
    LineEnd,
    /// On the body of a line element.
    OnLine,
}

/// Cursor-shape hint derived from a hit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    NwseResize,
    NeswResize,
    Move,
    #[default]
    Default,
}

/// Map a hit position to the cursor affordance shown while hovering it.
pub fn cursor_for_position(position: HitPosition) -> CursorHint {
    match position {
        HitPosition::TopLeft
        | HitPosition::BottomRight
        | HitPosition::LineStart
        | HitPosition::LineEnd => CursorHint::NwseResize,
        HitPosition::TopRight | HitPosition::BottomLeft => CursorHint::NeswResize,
        HitPosition::Inside | HitPosition::OnLine => CursorHint::Move,
    }
}

/// The point halfway between two coordinates.
///
/// Used as the quadratic-curve target when smoothing raw freehand samples.
pub fn midpoint(p: Point, q: Point) -> Point {
    Point::new((p.x + q.x) / 2.0, (p.y + q.y) / 2.0)
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

fn near_point(point: Point, target: Point, tolerance: f64) -> bool {
    let dx = point.x - target.x;
    let dy = point.y - target.y;
    (dx * dx + dy * dy).sqrt() <= tolerance
}

/// Test which part of an element (if any) the point falls on.
///
/// Line elements test proximity to the segment itself, not the bounding
/// box; rectangles and ellipses test corner proximity first, then interior
/// membership of the normalized box.
pub fn hit_test(point: Point, element: &Element, tolerance: f64) -> Option<HitPosition> {
    let bounds = element.bounds();
    match element.kind {
        ElementKind::Line => {
            if near_point(point, bounds.start(), tolerance) {
                Some(HitPosition::LineStart)
            } else if near_point(point, bounds.end(), tolerance) {
                Some(HitPosition::LineEnd)
            } else if point_to_segment_dist(point, bounds.start(), bounds.end()) <= tolerance {
                Some(HitPosition::OnLine)
            } else {
                None
            }
        }
        ElementKind::Rectangle | ElementKind::Ellipse => {
            let b = bounds.adjusted(element.kind);
            if near_point(point, Point::new(b.x1, b.y1), tolerance) {
                Some(HitPosition::TopLeft)
            } else if near_point(point, Point::new(b.x2, b.y1), tolerance) {
                Some(HitPosition::TopRight)
            } else if near_point(point, Point::new(b.x1, b.y2), tolerance) {
                Some(HitPosition::BottomLeft)
            } else if near_point(point, Point::new(b.x2, b.y2), tolerance) {
                Some(HitPosition::BottomRight)
            } else if b.contains(point) {
                Some(HitPosition::Inside)
            } else {
                None
            }
        }
    }
}

/// Compute the bounds after dragging a corner/endpoint to the cursor,
/// holding the opposite anchor fixed.
///
/// Positions that do not identify a resize handle return the original
/// bounds unchanged.
pub fn resized_coordinates(cursor: Point, position: HitPosition, original: Bounds) -> Bounds {
    let Bounds { x1, y1, x2, y2 } = original;
    match position {
        HitPosition::TopLeft | HitPosition::LineStart => Bounds::new(cursor.x, cursor.y, x2, y2),
        HitPosition::TopRight => Bounds::new(x1, cursor.y, cursor.x, y2),
        HitPosition::BottomLeft => Bounds::new(cursor.x, y1, x2, cursor.y),
        HitPosition::BottomRight | HitPosition::LineEnd => {
            Bounds::new(x1, y1, cursor.x, cursor.y)
        }
        HitPosition::Inside | HitPosition::OnLine => original,
    }
}
