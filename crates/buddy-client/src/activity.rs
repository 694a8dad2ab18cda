//! Local UI activity tracking
//!
//! The UI calls [`ActivityTracker::touch`] on user input; the worker reads
//! [`ActivityTracker::is_active`] to fill the heartbeat's `active` flag.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

#[derive(Debug)]
pub struct ActivityTracker {
    last_input: Mutex<Instant>,
}

impl ActivityTracker {
    /// Start out as freshly active
    pub fn new() -> Self {
        Self {
            last_input: Mutex::new(Instant::now()),
        }
    }

    /// Record user input
    pub fn touch(&self) {
        *self.last_input.lock() = Instant::now();
    }

    /// Time since the last recorded input
    pub fn idle_for(&self) -> Duration {
        self.last_input.lock().elapsed()
    }

    /// Whether input happened within `window`
    pub fn is_active(&self, window: Duration) -> bool {
        self.idle_for() < window
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}
