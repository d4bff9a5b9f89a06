//! Geometric elements and the shape factory.

use crate::color::Color;
use crate::error::ModelError;
use crate::geometry::Bounds;
use crate::tools::ToolKind;
use kurbo::{BezPath, Ellipse as KurboEllipse, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Stable handle for an element.
///
/// Handles are allocated monotonically by the scene model and never reused,
/// so an update referencing a removed element fails cleanly instead of
/// silently mutating whichever element got compacted into its slot.
pub type ElementId = u64;

/// Shape variant of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    Line,
    Rectangle,
    Ellipse,
}

impl ElementKind {
    /// Map a tool to the shape variant it draws, if any.
    pub fn from_tool(tool: ToolKind) -> Option<Self> {
        match tool {
            ToolKind::Line => Some(ElementKind::Line),
            ToolKind::Rectangle => Some(ElementKind::Rectangle),
            ToolKind::Ellipse => Some(ElementKind::Ellipse),
            _ => None,
        }
    }
}

/// A parametrized geometric shape, distinct from freehand strokes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub(crate) id: ElementId,
    /// Anchor and free corner; normalized on interaction release.
    pub bounds: Bounds,
    pub kind: ElementKind,
    pub stroke_width: f64,
    pub stroke_color: Color,
    /// Renderable payload, deterministically derived from the fields above.
    path: BezPath,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The derived render path.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Rebuild this element with new geometry/style, keeping id and kind.
    pub fn with_geometry(&self, bounds: Bounds, stroke_width: f64, stroke_color: Color) -> Self {
        Self {
            id: self.id,
            bounds,
            kind: self.kind,
            stroke_width,
            stroke_color,
            path: build_path(self.kind, bounds),
        }
    }

    /// Copy of this element with normalized coordinates.
    pub fn adjusted(&self) -> Self {
        self.with_geometry(self.bounds.adjusted(self.kind), self.stroke_width, self.stroke_color)
    }
}

/// Construct a typed element from a tool, two corners and a style.
///
/// Pure and deterministic: identical inputs always yield an equivalent
/// element, including the derived render path. Tools that do not draw a
/// shape fail with [`ModelError::UnsupportedShapeKind`]; callers ignore the
/// element and carry on.
pub fn create_element(
    id: ElementId,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    tool: ToolKind,
    stroke_width: f64,
    stroke_color: Color,
) -> Result<Element, ModelError> {
    let kind = ElementKind::from_tool(tool).ok_or(ModelError::UnsupportedShapeKind(tool))?;
    let bounds = Bounds::new(x1, y1, x2, y2);
    Ok(Element {
        id,
        bounds,
        kind,
        stroke_width,
        stroke_color,
        path: build_path(kind, bounds),
    })
}

/// Derive the render path for a shape variant.
fn build_path(kind: ElementKind, bounds: Bounds) -> BezPath {
    match kind {
        ElementKind::Line => {
            let mut path = BezPath::new();
            path.move_to(bounds.start());
            path.line_to(bounds.end());
            path
        }
        ElementKind::Rectangle => {
            let rect = Rect::new(bounds.x1, bounds.y1, bounds.x2, bounds.y2);
            rect.to_path(0.1)
        }
        ElementKind::Ellipse => {
            let rect = Rect::new(bounds.x1, bounds.y1, bounds.x2, bounds.y2);
            let ellipse = KurboEllipse::new(
                rect.center(),
                (rect.width().abs() / 2.0, rect.height().abs() / 2.0),
                0.0,
            );
            ellipse.to_path(0.1)
        }
    }
}
