//! Sync bridge errors.

use sketchroom_render::RenderError;
use thiserror::Error;

/// Errors raised while exchanging snapshots with the room.
///
/// None of these abort the session. The bridge logs and drops the
/// affected frame; local drawing keeps working while disconnected.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("room channel is not connected")]
    Connection,
    #[error("inbound frame dropped: {0}")]
    Decode(String),
    #[error(transparent)]
    Snapshot(#[from] RenderError),
}
