//! Wire messages exchanged within a room.

use crate::error::SyncError;
use serde::{Deserialize, Serialize};

/// Messages carried over the room channel.
///
/// The protocol is deliberately dumb: a full-frame snapshot per message,
/// no deltas, no ordering guarantees beyond channel order. Last applied
/// snapshot wins on the receiving side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    /// Full-frame snapshot from a peer.
    Draw {
        /// Room the snapshot belongs to.
        room: String,
        /// Sender identity, used to suppress self-echo.
        userid: u64,
        /// Base64-encoded PNG of the sender's whole surface.
        blob: String,
    },
}

impl WireMessage {
    /// Serialize to the JSON representation sent over the channel.
    pub fn encode(&self) -> Result<String, SyncError> {
        serde_json::to_string(self).map_err(|e| SyncError::Decode(e.to_string()))
    }

    /// Parse a channel payload.
    pub fn decode(payload: &str) -> Result<Self, SyncError> {
        serde_json::from_str(payload).map_err(|e| SyncError::Decode(e.to_string()))
    }
}

/// Base64-encode a snapshot blob.
pub fn encode_blob(bytes: &[u8]) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine};
    STANDARD.encode(bytes)
}

/// Decode a base64 snapshot blob.
pub fn decode_blob(blob: &str) -> Result<Vec<u8>, SyncError> {
    use base64::{engine::general_purpose::STANDARD, Engine};
    STANDARD
        .decode(blob)
        .map_err(|e| SyncError::Decode(e.to_string()))
}
