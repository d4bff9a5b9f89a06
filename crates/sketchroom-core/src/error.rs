//! Error taxonomy for the scene model.

use crate::element::ElementId;
use crate::tools::ToolKind;
use thiserror::Error;

/// Recoverable errors raised by the shape factory and scene model.
///
/// None of these are fatal to a session; callers drop the offending
/// operation and the interaction state machine returns to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The tool does not map to a geometric shape variant.
    #[error("tool {0:?} does not produce a shape element")]
    UnsupportedShapeKind(ToolKind),

    /// A stale element id was referenced after the element was removed.
    #[error("element {0} no longer exists")]
    IndexOutOfRange(ElementId),
}
