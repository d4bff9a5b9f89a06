//! Trailing-edge debounce timer.

use std::time::{Duration, Instant};

/// Quiet period before a burst of local edits is broadcast.
pub const SYNC_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Trailing-edge debounce: every notification pushes the deadline out by
/// the quiet period; the timer fires once when the deadline passes with
/// no further notifications.
///
/// Time is injected so tests never sleep.
#[derive(Debug, Clone)]
pub struct Debounce {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Record activity at `now`, rescheduling the deadline.
    pub fn notify(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// Whether a deadline is scheduled.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fire if the quiet period has elapsed. Consumes the deadline.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any scheduled deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}
