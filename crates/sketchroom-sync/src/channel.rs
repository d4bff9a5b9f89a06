//! Room channel abstraction and an in-memory loopback implementation.

use crate::error::SyncError;
use std::sync::{Arc, Mutex};

/// Transport seam between the sync bridge and the outside world.
///
/// Poll-based rather than callback-based: the host drives `poll` from its
/// event loop and hands the payloads to the bridge.
pub trait RoomChannel {
    /// Broadcast a payload to the room.
    fn emit(&mut self, payload: &str) -> Result<(), SyncError>;

    /// Drain payloads that arrived since the last poll. Includes the
    /// caller's own broadcasts; dedup happens at the message level.
    fn poll(&mut self) -> Vec<String>;

    fn is_connected(&self) -> bool;
}

/// Shared backing store for [`MemoryChannel`] endpoints.
///
/// Every endpoint sees every payload in emit order, its own included,
/// which mirrors a relay that echoes broadcasts back to the sender.
///
/// The backing log is append-only and never compacted, so it grows with
/// every broadcast for the hub's lifetime. That is fine for the tests
/// and demos this exists for; a long-lived session needs a real
/// transport behind [`RoomChannel`].
#[derive(Debug, Clone, Default)]
pub struct MemoryHub {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemoryHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new endpoint on this hub.
    pub fn endpoint(&self) -> MemoryChannel {
        MemoryChannel {
            messages: Arc::clone(&self.messages),
            cursor: 0,
            connected: true,
        }
    }
}

/// In-process loopback channel, used for tests and single-machine demos.
#[derive(Debug)]
pub struct MemoryChannel {
    messages: Arc<Mutex<Vec<String>>>,
    cursor: usize,
    connected: bool,
}

impl MemoryChannel {
    /// Simulate losing the connection.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    pub fn reconnect(&mut self) {
        self.connected = true;
    }
}

impl RoomChannel for MemoryChannel {
    fn emit(&mut self, payload: &str) -> Result<(), SyncError> {
        if !self.connected {
            return Err(SyncError::Connection);
        }
        let mut messages = self.messages.lock().map_err(|_| SyncError::Connection)?;
        messages.push(payload.to_owned());
        Ok(())
    }

    fn poll(&mut self) -> Vec<String> {
        if !self.connected {
            return Vec::new();
        }
        let Ok(messages) = self.messages.lock() else {
            return Vec::new();
        };
        let new = messages[self.cursor..].to_vec();
        self.cursor = messages.len();
        new
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_see_each_other() {
        let hub = MemoryHub::new();
        let mut a = hub.endpoint();
        let mut b = hub.endpoint();

        a.emit("hello").unwrap();
        assert_eq!(b.poll(), vec!["hello".to_owned()]);
        // drained
        assert!(b.poll().is_empty());
        // sender sees its own broadcast too
        assert_eq!(a.poll(), vec!["hello".to_owned()]);
    }

    #[test]
    fn test_disconnected_emit_fails() {
        let hub = MemoryHub::new();
        let mut a = hub.endpoint();
        a.disconnect();
        assert!(matches!(a.emit("x"), Err(SyncError::Connection)));
        assert!(!a.is_connected());

        a.reconnect();
        assert!(a.emit("x").is_ok());
    }
}
