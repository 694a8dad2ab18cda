//! Mailbox store.
//!
//! Each recipient owns a slot holding a FIFO queue and a wake signal. Enqueue
//! appends under the slot's lock and then wakes every waiter registered on
//! that slot; drain swaps the whole queue out under the same lock, so a
//! message is handed to exactly one drain.

use buddy_core::{Message, ScreenName};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::futures::Notified;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct MailboxSlot {
    queue: Mutex<VecDeque<Message>>,
    notify: Notify,
}

impl MailboxSlot {
    fn drain(&self) -> Vec<Message> {
        let drained = std::mem::take(&mut *self.queue.lock());
        Vec::from(drained)
    }
}

/// Per-recipient pending-message queues
///
/// Slots are created on first use and kept for the life of the store, so a
/// waiter holding a slot never misses a message enqueued after it subscribed.
#[derive(Debug, Default)]
pub struct Mailbox {
    slots: DashMap<ScreenName, Arc<MailboxSlot>>,
}

impl Mailbox {
    /// Create an empty mailbox store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, name: &ScreenName) -> Arc<MailboxSlot> {
        if let Some(slot) = self.slots.get(name.as_str()) {
            return slot.clone();
        }
        self.slots.entry(name.clone()).or_default().clone()
    }

    /// Append a message to its recipient's queue; returns the queue depth
    pub fn enqueue(&self, message: Message) -> usize {
        let slot = self.slot(&message.to);
        let to = message.to.clone();

        let depth = {
            let mut queue = slot.queue.lock();
            queue.push_back(message);
            queue.len()
        };
        slot.notify.notify_waiters();

        tracing::debug!(recipient = %to, depth, "Message enqueued");

        depth
    }

    /// Remove and return everything pending for `name`, oldest first
    pub fn drain(&self, name: &str) -> Vec<Message> {
        let Some(slot) = self.slots.get(name).map(|s| s.clone()) else {
            return Vec::new();
        };
        slot.drain()
    }

    /// Number of messages waiting for `name`
    pub fn pending(&self, name: &str) -> usize {
        self.slots
            .get(name)
            .map_or(0, |slot| slot.queue.lock().len())
    }

    /// Total messages waiting across all recipients
    pub fn total_pending(&self) -> usize {
        self.slots.iter().map(|slot| slot.queue.lock().len()).sum()
    }

    /// Number of recipients with a slot
    pub fn recipients(&self) -> usize {
        self.slots.len()
    }

    /// Subscribe to a recipient's slot for waiting on new messages
    pub fn waiter(&self, name: &ScreenName) -> MailboxWaiter {
        MailboxWaiter {
            slot: self.slot(name),
        }
    }
}

/// Handle for a consumer waiting on one recipient's queue
///
/// Register interest with [`MailboxWaiter::notified`] (and `enable` it)
/// before calling [`MailboxWaiter::drain`]; an enqueue landing between the
/// two then still wakes the waiter.
#[derive(Debug, Clone)]
pub struct MailboxWaiter {
    slot: Arc<MailboxSlot>,
}

impl MailboxWaiter {
    /// Future resolving on the next enqueue to this recipient
    pub fn notified(&self) -> Notified<'_> {
        self.slot.notify.notified()
    }

    /// Atomically empty the recipient's queue
    pub fn drain(&self) -> Vec<Message> {
        self.slot.drain()
    }
}
