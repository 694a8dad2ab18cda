//! Long-poll dispatcher
//!
//! Holds a request open on one recipient's mailbox until messages arrive or
//! the deadline passes. A waiting request wakes on the mailbox's enqueue
//! signal and also rechecks at a fixed interval, so a missed wake-up costs at
//! most one interval.
//!
//! ```text
//! WAITING ──drain non-empty──▶ HAS_DATA
//!    │
//!    └────now >= deadline────▶ TIMED_OUT
//! ```

use std::time::Duration;

use buddy_core::Message;
use buddy_presence::MailboxWaiter;
use tokio::time::{sleep_until, Instant};

/// Result of one long-poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Messages were drained (never empty)
    HasData(Vec<Message>),
    /// Deadline passed with nothing pending
    TimedOut,
}

impl PollOutcome {
    /// Messages delivered by this poll (empty on timeout)
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            Self::HasData(messages) => messages,
            Self::TimedOut => Vec::new(),
        }
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }
}

/// Wait on `waiter` until it yields messages or `timeout` elapses
///
/// The mailbox is always drained at least once, so a zero timeout behaves
/// as a non-blocking check.
pub async fn wait_for_messages(
    waiter: &MailboxWaiter,
    timeout: Duration,
    recheck_interval: Duration,
) -> PollOutcome {
    let deadline = Instant::now() + timeout;

    loop {
        // Register for the wake-up before draining so an enqueue racing the
        // drain is never lost.
        let notified = waiter.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();

        let batch = waiter.drain();
        if !batch.is_empty() {
            return PollOutcome::HasData(batch);
        }

        let now = Instant::now();
        if now >= deadline {
            return PollOutcome::TimedOut;
        }

        let recheck_at = (now + recheck_interval).min(deadline);
        tokio::select! {
            () = &mut notified => {}
            () = sleep_until(recheck_at) => {}
        }
    }
}
