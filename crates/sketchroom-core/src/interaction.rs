//! Interaction state machine: turns pointer events plus the current tool
//! selection into scene mutations and cursor-affordance hints.

use crate::element::ElementId;
use crate::geometry::{
    cursor_for_position, resized_coordinates, Bounds, CursorHint, HitPosition,
    DEFAULT_HIT_TOLERANCE,
};
use crate::scene::SceneModel;
use crate::stroke::{Stroke, StrokePoint};
use crate::tools::{ToolConfig, ToolKind};
use kurbo::{Point, Vec2};

/// Current interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Freehand stroke in progress.
    Sketching,
    /// Shape element being stretched out.
    Drawing,
    /// Selected element being translated.
    Moving,
    /// Selected element corner/endpoint being dragged.
    Resizing,
    /// Eraser held down.
    Erasing,
}

/// Transient reference to a grabbed element.
///
/// Exists only while a moving or resizing interaction is active.
#[derive(Debug, Clone, Copy)]
pub struct Selection {
    pub id: ElementId,
    /// Which part of the element was grabbed.
    pub grabbed: HitPosition,
    /// Pointer offset from the element's anchor at grab time.
    pub offset: Vec2,
    /// Element bounds at grab time; resizing is computed against these.
    pub original: Bounds,
}

/// Drives the scene model from pointer-down/move/up events.
///
/// All handled errors are log-level only; the machine always returns to
/// [`InteractionState::Idle`] so input keeps working.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    /// Stroke in progress; committed to the history on release.
    pending_stroke: Vec<StrokePoint>,
    /// Tool config snapshotted at pointer-down for the whole interaction.
    active_config: Option<ToolConfig>,
    /// Element being stretched by a shape tool.
    active_element: Option<ElementId>,
    selection: Option<Selection>,
    hit_tolerance: f64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            state: InteractionState::Idle,
            pending_stroke: Vec::new(),
            active_config: None,
            active_element: None,
            selection: None,
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
        }
    }

    /// Override the hit-test tolerance band.
    pub fn with_hit_tolerance(mut self, tolerance: f64) -> Self {
        self.hit_tolerance = tolerance;
        self
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// The stroke buffer of an active sketching interaction.
    pub fn pending_stroke(&self) -> &[StrokePoint] {
        &self.pending_stroke
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    fn reset(&mut self) {
        self.state = InteractionState::Idle;
        self.pending_stroke.clear();
        self.active_config = None;
        self.active_element = None;
        self.selection = None;
    }

    /// Handle pointer-down with the toolbar's current configuration.
    pub fn pointer_down(&mut self, scene: &mut SceneModel, pos: Point, config: &ToolConfig) {
        // A stray down while an interaction is active restarts cleanly.
        if self.state != InteractionState::Idle {
            self.reset();
        }
        self.active_config = Some(*config);

        match config.tool {
            ToolKind::Pencil | ToolKind::Brush => {
                self.pending_stroke.clear();
                self.pending_stroke.push(StrokePoint::new(
                    pos,
                    config.color,
                    config.freehand_width,
                    config.tool.stroke_opacity(),
                ));
                self.state = InteractionState::Sketching;
            }
            ToolKind::Line | ToolKind::Rectangle | ToolKind::Ellipse => {
                match scene.create_element(
                    pos.x,
                    pos.y,
                    pos.x,
                    pos.y,
                    config.tool,
                    config.shape_width,
                    config.color,
                ) {
                    Ok(id) => {
                        self.active_element = Some(id);
                        self.state = InteractionState::Drawing;
                    }
                    Err(err) => {
                        log::warn!("shape creation ignored: {err}");
                        self.reset();
                    }
                }
            }
            ToolKind::Selection => {
                if let Some((id, grabbed)) = scene.hit_test_elements(pos, self.hit_tolerance) {
                    // element() cannot miss here; the id came from the scan above
                    if let Some(element) = scene.element(id) {
                        let bounds = element.bounds();
                        self.selection = Some(Selection {
                            id,
                            grabbed,
                            offset: Vec2::new(pos.x - bounds.x1, pos.y - bounds.y1),
                            original: bounds,
                        });
                        self.state = match grabbed {
                            HitPosition::Inside | HitPosition::OnLine => InteractionState::Moving,
                            _ => InteractionState::Resizing,
                        };
                    }
                }
            }
            ToolKind::Eraser => {
                self.state = InteractionState::Erasing;
                scene.erase_at(pos);
            }
            // Text entry is a stub
            ToolKind::Text => {}
        }
    }

    /// Handle pointer-move; returns the cursor affordance to show.
    pub fn pointer_move(
        &mut self,
        scene: &mut SceneModel,
        pos: Point,
        config: &ToolConfig,
    ) -> CursorHint {
        match self.state {
            InteractionState::Idle => {
                if config.tool == ToolKind::Selection {
                    scene
                        .hit_test_elements(pos, self.hit_tolerance)
                        .map(|(_, p)| cursor_for_position(p))
                        .unwrap_or_default()
                } else {
                    CursorHint::Default
                }
            }
            InteractionState::Sketching => {
                // Style is frozen at stroke start; sample only the position.
                if let Some(first) = self.pending_stroke.first().copied() {
                    self.pending_stroke.push(StrokePoint::new(
                        pos,
                        first.color,
                        first.width,
                        first.opacity,
                    ));
                }
                CursorHint::Default
            }
            InteractionState::Drawing => {
                if let Some(id) = self.active_element {
                    let update = scene.element(id).map(|e| e.bounds()).map(|b| {
                        (Bounds::new(b.x1, b.y1, pos.x, pos.y), self.active_style())
                    });
                    match update {
                        Some((bounds, (width, color))) => {
                            if let Err(err) = scene.update_element(id, bounds, width, color) {
                                log::warn!("drag update dropped: {err}");
                                self.reset();
                            }
                        }
                        None => {
                            log::warn!("element {id} vanished mid-draw");
                            self.reset();
                        }
                    }
                }
                CursorHint::Default
            }
            InteractionState::Moving => {
                if let Some(sel) = self.selection {
                    let new_x1 = pos.x - sel.offset.x;
                    let new_y1 = pos.y - sel.offset.y;
                    let bounds = Bounds::new(
                        new_x1,
                        new_y1,
                        new_x1 + sel.original.width(),
                        new_y1 + sel.original.height(),
                    );
                    self.apply_selection_update(scene, sel.id, bounds);
                }
                CursorHint::Move
            }
            InteractionState::Resizing => {
                if let Some(sel) = self.selection {
                    let bounds = resized_coordinates(pos, sel.grabbed, sel.original);
                    self.apply_selection_update(scene, sel.id, bounds);
                    return cursor_for_position(sel.grabbed);
                }
                CursorHint::Default
            }
            InteractionState::Erasing => {
                scene.erase_at(pos);
                CursorHint::Default
            }
        }
    }

    /// Handle pointer-up: freeze, normalize and return to idle.
    pub fn pointer_up(&mut self, scene: &mut SceneModel) {
        match self.state {
            InteractionState::Sketching => {
                let points = std::mem::take(&mut self.pending_stroke);
                scene.append_stroke(Stroke::from_points(points));
            }
            InteractionState::Drawing => {
                if let Some(id) = self.active_element {
                    if let Err(err) = scene.adjust_element(id) {
                        log::warn!("adjust on release dropped: {err}");
                    }
                }
            }
            InteractionState::Moving | InteractionState::Resizing => {
                if let Some(sel) = self.selection {
                    if let Err(err) = scene.adjust_element(sel.id) {
                        log::warn!("adjust on release dropped: {err}");
                    }
                }
            }
            InteractionState::Idle | InteractionState::Erasing => {}
        }
        self.reset();
    }

    /// Shape style snapshotted at pointer-down.
    fn active_style(&self) -> (f64, crate::color::Color) {
        let config = self.active_config.unwrap_or_default();
        (config.shape_width, config.color)
    }

    fn apply_selection_update(&mut self, scene: &mut SceneModel, id: ElementId, bounds: Bounds) {
        let style = scene.element(id).map(|e| (e.stroke_width, e.stroke_color));
        match style {
            Some((width, color)) => {
                if let Err(err) = scene.update_element(id, bounds, width, color) {
                    log::warn!("selection update dropped: {err}");
                    self.reset();
                }
            }
            None => {
                log::warn!("selected element {id} vanished mid-drag");
                self.reset();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::element::ElementKind;

    fn pencil_config() -> ToolConfig {
        ToolConfig {
            tool: ToolKind::Pencil,
            color: Color::from_hex("#0000FF"),
            freehand_width: 3.0,
            shape_width: 1.0,
        }
    }

    #[test]
    fn test_pencil_stroke_length_is_moves_plus_one() {
        let mut scene = SceneModel::new();
        let mut ctl = InteractionController::new();
        let config = pencil_config();

        ctl.pointer_down(&mut scene, Point::new(0.0, 0.0), &config);
        assert_eq!(ctl.state(), InteractionState::Sketching);

        let moves = 7;
        for i in 1..=moves {
            ctl.pointer_move(&mut scene, Point::new(i as f64, i as f64), &config);
        }
        ctl.pointer_up(&mut scene);

        assert_eq!(ctl.state(), InteractionState::Idle);
        assert_eq!(scene.stroke_count(), 1);
        assert_eq!(scene.strokes()[0].len(), moves + 1);
    }

    #[test]
    fn test_stroke_style_frozen_at_start() {
        let mut scene = SceneModel::new();
        let mut ctl = InteractionController::new();
        let config = pencil_config();

        ctl.pointer_down(&mut scene, Point::new(0.0, 0.0), &config);

        // Toolbar changes mid-drag must not leak into the active stroke
        let mut changed = config;
        changed.color = Color::from_hex("#FF0000");
        changed.freehand_width = 9.0;
        ctl.pointer_move(&mut scene, Point::new(5.0, 5.0), &changed);
        ctl.pointer_up(&mut scene);

        let stroke = &scene.strokes()[0];
        for p in &stroke.points {
            assert_eq!(p.color, Color::from_hex("#0000FF"));
            assert!((p.width - 3.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_brush_strokes_are_translucent() {
        let mut scene = SceneModel::new();
        let mut ctl = InteractionController::new();
        let config = pencil_config().with_tool(ToolKind::Brush);

        ctl.pointer_down(&mut scene, Point::new(0.0, 0.0), &config);
        ctl.pointer_up(&mut scene);

        assert!((scene.strokes()[0].points[0].opacity - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_text_tool_is_a_stub() {
        let mut scene = SceneModel::new();
        let mut ctl = InteractionController::new();
        let config = pencil_config().with_tool(ToolKind::Text);

        ctl.pointer_down(&mut scene, Point::new(0.0, 0.0), &config);
        assert_eq!(ctl.state(), InteractionState::Idle);
        ctl.pointer_up(&mut scene);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_eraser_erases_on_down_and_move() {
        let mut scene = SceneModel::new();
        let mut ctl = InteractionController::new();

        // Two strokes far apart
        let pencil = pencil_config();
        for start in [0.0, 100.0] {
            ctl.pointer_down(&mut scene, Point::new(start, start), &pencil);
            ctl.pointer_up(&mut scene);
        }
        assert_eq!(scene.stroke_count(), 2);

        let eraser = pencil.with_tool(ToolKind::Eraser);
        ctl.pointer_down(&mut scene, Point::new(0.0, 0.0), &eraser);
        assert_eq!(ctl.state(), InteractionState::Erasing);
        assert_eq!(scene.stroke_count(), 1);

        ctl.pointer_move(&mut scene, Point::new(100.0, 100.0), &eraser);
        assert_eq!(scene.stroke_count(), 0);
        ctl.pointer_up(&mut scene);
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn test_draw_rectangle_end_to_end() {
        let mut scene = SceneModel::new();
        let mut ctl = InteractionController::new();
        let config = ToolConfig {
            tool: ToolKind::Rectangle,
            color: Color::from_hex("#FF0000"),
            freehand_width: 1.0,
            shape_width: 2.0,
        };

        ctl.pointer_down(&mut scene, Point::new(10.0, 10.0), &config);
        assert_eq!(ctl.state(), InteractionState::Drawing);
        ctl.pointer_move(&mut scene, Point::new(60.0, 40.0), &config);
        ctl.pointer_move(&mut scene, Point::new(100.0, 80.0), &config);
        ctl.pointer_up(&mut scene);

        assert_eq!(scene.element_count(), 1);
        let el = &scene.elements()[0];
        assert_eq!(el.kind, ElementKind::Rectangle);
        assert_eq!(el.bounds(), Bounds::new(10.0, 10.0, 100.0, 80.0));
        assert_eq!(el.stroke_color, Color::new(255, 0, 0, 255));
        assert!((el.stroke_width - 2.0).abs() < f64::EPSILON);

        // Select at (50,50): hit is inside
        let select = config.with_tool(ToolKind::Selection);
        let (_, pos) = scene.hit_test_elements(Point::new(50.0, 50.0), 10.0).unwrap();
        assert_eq!(pos, HitPosition::Inside);

        // Drag to (60,60): translation by (10,10), dimensions preserved
        ctl.pointer_down(&mut scene, Point::new(50.0, 50.0), &select);
        assert_eq!(ctl.state(), InteractionState::Moving);
        ctl.pointer_move(&mut scene, Point::new(60.0, 60.0), &select);
        ctl.pointer_up(&mut scene);

        let el = &scene.elements()[0];
        assert_eq!(el.bounds(), Bounds::new(20.0, 20.0, 110.0, 90.0));
        assert!((el.bounds().width() - 90.0).abs() < f64::EPSILON);
        assert!((el.bounds().height() - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_from_corner_holds_anchor() {
        let mut scene = SceneModel::new();
        let mut ctl = InteractionController::new();
        let config = pencil_config().with_tool(ToolKind::Rectangle);

        ctl.pointer_down(&mut scene, Point::new(10.0, 10.0), &config);
        ctl.pointer_move(&mut scene, Point::new(100.0, 80.0), &config);
        ctl.pointer_up(&mut scene);

        let select = config.with_tool(ToolKind::Selection);
        ctl.pointer_down(&mut scene, Point::new(100.0, 80.0), &select);
        assert_eq!(ctl.state(), InteractionState::Resizing);
        let hint = ctl.pointer_move(&mut scene, Point::new(140.0, 120.0), &select);
        assert_eq!(hint, CursorHint::NwseResize);
        ctl.pointer_up(&mut scene);

        assert_eq!(scene.elements()[0].bounds(), Bounds::new(10.0, 10.0, 140.0, 120.0));
    }

    #[test]
    fn test_resize_past_anchor_normalizes_on_release() {
        let mut scene = SceneModel::new();
        let mut ctl = InteractionController::new();
        let config = pencil_config().with_tool(ToolKind::Rectangle);

        ctl.pointer_down(&mut scene, Point::new(50.0, 50.0), &config);
        // Drag up-left of the anchor; release must normalize
        ctl.pointer_move(&mut scene, Point::new(10.0, 20.0), &config);
        ctl.pointer_up(&mut scene);

        assert_eq!(scene.elements()[0].bounds(), Bounds::new(10.0, 20.0, 50.0, 50.0));
    }

    #[test]
    fn test_selection_miss_keeps_idle() {
        let mut scene = SceneModel::new();
        let mut ctl = InteractionController::new();
        let select = pencil_config().with_tool(ToolKind::Selection);

        ctl.pointer_down(&mut scene, Point::new(42.0, 42.0), &select);
        assert_eq!(ctl.state(), InteractionState::Idle);
        assert!(ctl.selection().is_none());
    }

    #[test]
    fn test_hover_affordance_with_selection_tool() {
        let mut scene = SceneModel::new();
        let mut ctl = InteractionController::new();
        let config = pencil_config().with_tool(ToolKind::Rectangle);

        ctl.pointer_down(&mut scene, Point::new(10.0, 10.0), &config);
        ctl.pointer_move(&mut scene, Point::new(100.0, 80.0), &config);
        ctl.pointer_up(&mut scene);

        let select = config.with_tool(ToolKind::Selection);
        let inside = ctl.pointer_move(&mut scene, Point::new(50.0, 50.0), &select);
        assert_eq!(inside, CursorHint::Move);
        let corner = ctl.pointer_move(&mut scene, Point::new(100.0, 10.0), &select);
        assert_eq!(corner, CursorHint::NeswResize);
        let miss = ctl.pointer_move(&mut scene, Point::new(400.0, 400.0), &select);
        assert_eq!(miss, CursorHint::Default);
    }
}
