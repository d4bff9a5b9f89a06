//! Room synchronization for sketchroom.
//!
//! Peers in a room exchange full-frame PNG snapshots over a pluggable
//! [`RoomChannel`]. Outbound frames are debounced so a burst of edits
//! costs one broadcast; inbound frames are filtered by room and sender
//! and painted straight onto the local surface.

mod bridge;
mod channel;
mod debounce;
mod error;
mod message;

pub use bridge::SyncBridge;
pub use channel::{MemoryChannel, MemoryHub, RoomChannel};
pub use debounce::{Debounce, SYNC_DEBOUNCE};
pub use error::SyncError;
pub use message::{decode_blob, encode_blob, WireMessage};
