//! The scene model: stroke history plus the element collection.

use crate::color::Color;
use crate::element::{create_element, Element, ElementId};
use crate::error::ModelError;
use crate::geometry::{self, Bounds, HitPosition};
use crate::stroke::Stroke;
use crate::tools::ToolKind;
use kurbo::Point;

/// Default erase-by-proximity radius in canvas units.
pub const DEFAULT_ERASE_RADIUS: f64 = 10.0;

/// Owns the two persistent collections of the drawing surface: the ordered
/// freehand stroke history and the geometric element collection.
///
/// Insertion order is render order for both; later entries paint over
/// earlier ones. Every mutation marks the model dirty (consumed by the
/// renderer) and bumps a revision counter (observed by the sync bridge).
#[derive(Debug, Clone)]
pub struct SceneModel {
    strokes: Vec<Stroke>,
    elements: Vec<Element>,
    next_id: ElementId,
    erase_radius: f64,
    dirty: bool,
    revision: u64,
}

impl Default for SceneModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneModel {
    pub fn new() -> Self {
        Self {
            strokes: Vec::new(),
            elements: Vec::new(),
            next_id: 0,
            erase_radius: DEFAULT_ERASE_RADIUS,
            dirty: false,
            revision: 0,
        }
    }

    /// Override the erase-by-proximity radius.
    pub fn with_erase_radius(mut self, radius: f64) -> Self {
        self.erase_radius = radius;
        self
    }

    pub fn erase_radius(&self) -> f64 {
        self.erase_radius
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    /// Consume the dirty flag; returns true if a redraw is due.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Monotonic change counter, bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // --- Strokes ---

    /// Commit a finished stroke to the history. The stroke is frozen from
    /// here on; only the eraser can remove it.
    pub fn append_stroke(&mut self, stroke: Stroke) {
        if stroke.is_empty() {
            return;
        }
        self.strokes.push(stroke);
        self.mark_dirty();
    }

    /// Strokes in render order.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Remove the earliest-added stroke with a sample within the erase
    /// radius of the point. Matches are collected in a scan pass and
    /// removed in a second pass, never while iterating.
    pub fn remove_stroke_if_near(&mut self, point: Point) -> bool {
        let hit = self
            .strokes
            .iter()
            .position(|stroke| stroke.contains_near(point, self.erase_radius));
        if let Some(index) = hit {
            self.strokes.remove(index);
            self.mark_dirty();
            true
        } else {
            false
        }
    }

    // --- Elements ---

    /// Construct a new element via the shape factory and add it to the
    /// collection. Returns the allocated handle.
    pub fn create_element(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        tool: ToolKind,
        stroke_width: f64,
        stroke_color: Color,
    ) -> Result<ElementId, ModelError> {
        let id = self.next_id;
        let element = create_element(id, x1, y1, x2, y2, tool, stroke_width, stroke_color)?;
        self.next_id += 1;
        self.elements.push(element);
        self.mark_dirty();
        Ok(id)
    }

    /// Elements in render order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id() == id)
    }

    fn element_index(&self, id: ElementId) -> Result<usize, ModelError> {
        self.elements
            .iter()
            .position(|e| e.id() == id)
            .ok_or(ModelError::IndexOutOfRange(id))
    }

    /// Replace an element's geometry and style with a freshly constructed
    /// one. A stale handle (element removed since the caller observed it)
    /// fails with [`ModelError::IndexOutOfRange`]; the update is dropped.
    pub fn update_element(
        &mut self,
        id: ElementId,
        bounds: Bounds,
        stroke_width: f64,
        stroke_color: Color,
    ) -> Result<(), ModelError> {
        let index = self.element_index(id)?;
        self.elements[index] = self.elements[index].with_geometry(bounds, stroke_width, stroke_color);
        self.mark_dirty();
        Ok(())
    }

    /// Normalize an element's coordinates, applied once on interaction
    /// release so downstream hit-testing can assume ordered bounds.
    pub fn adjust_element(&mut self, id: ElementId) -> Result<(), ModelError> {
        let index = self.element_index(id)?;
        self.elements[index] = self.elements[index].adjusted();
        self.mark_dirty();
        Ok(())
    }

    /// Remove the first element (in insertion order) whose normalized
    /// bounding box contains the point.
    pub fn remove_element_if_contains(&mut self, point: Point) -> bool {
        let hit = self
            .elements
            .iter()
            .position(|e| e.bounds().adjusted(e.kind).contains(point));
        if let Some(index) = hit {
            self.elements.remove(index);
            self.mark_dirty();
            true
        } else {
            false
        }
    }

    /// Eraser entry point: try strokes first, then elements.
    pub fn erase_at(&mut self, point: Point) -> bool {
        let stroke = self.remove_stroke_if_near(point);
        let element = self.remove_element_if_contains(point);
        stroke || element
    }

    /// Hit-test the element collection at a point.
    ///
    /// Tie-break when elements overlap: the first match in insertion order
    /// wins (earliest-drawn takes precedence).
    pub fn hit_test_elements(
        &self,
        point: Point,
        tolerance: f64,
    ) -> Option<(ElementId, HitPosition)> {
        self.elements
            .iter()
            .find_map(|e| geometry::hit_test(point, e, tolerance).map(|pos| (e.id(), pos)))
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.elements.is_empty()
    }
}
