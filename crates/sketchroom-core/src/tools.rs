//! Tool selection and per-interaction drawing configuration.

use crate::color::Color;
use serde::{Deserialize, Serialize};

/// Opacity applied to brush strokes (pencil strokes are fully opaque).
pub const BRUSH_OPACITY: f64 = 0.1;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Pencil,
    Brush,
    Line,
    Rectangle,
    Ellipse,
    Selection,
    Eraser,
    Text,
}

impl ToolKind {
    /// Whether this tool produces freehand strokes.
    pub fn is_freehand(&self) -> bool {
        matches!(self, ToolKind::Pencil | ToolKind::Brush)
    }

    /// Whether this tool produces a geometric element.
    pub fn is_shape(&self) -> bool {
        matches!(self, ToolKind::Line | ToolKind::Rectangle | ToolKind::Ellipse)
    }

    /// Stroke transparency for freehand tools.
    pub fn stroke_opacity(&self) -> f64 {
        match self {
            ToolKind::Brush => BRUSH_OPACITY,
            _ => 1.0,
        }
    }
}

/// Configuration supplied by the toolbar, read at each interaction event.
///
/// The interaction controller snapshots this at pointer-down; changes made
/// mid-drag do not affect the active interaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Currently selected tool.
    pub tool: ToolKind,
    /// Stroke color for both freehand strokes and shapes.
    pub color: Color,
    /// Line width for freehand strokes.
    pub freehand_width: f64,
    /// Line width for geometric shapes.
    pub shape_width: f64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            tool: ToolKind::default(),
            color: Color::from_hex("#32B37A"),
            freehand_width: 1.0,
            shape_width: 1.0,
        }
    }
}

impl ToolConfig {
    /// Copy of this config with a different tool selected.
    pub fn with_tool(self, tool: ToolKind) -> Self {
        Self { tool, ..self }
    }
}
