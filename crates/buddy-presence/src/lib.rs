//! # buddy-presence
//!
//! Process-wide in-memory state for the presence and messaging core.
//!
//! ## Features
//!
//! - **Presence**: last-heartbeat / last-active timestamps and the derived status
//! - **Mailbox**: per-recipient FIFO queues with atomic drain and wake-ups
//! - **Typing**: short-lived "is typing" markers with lazy expiry
//!
//! Every store is internally synchronized and meant to be shared behind an
//! `Arc`; nothing here is a global. State lives exactly as long as the
//! process that owns the stores.
//!
//! ## Example
//!
//! ```ignore
//! use buddy_presence::{Mailbox, PresenceStore, TypingStore};
//!
//! let presence = PresenceStore::new(clock.clone(), &config.presence);
//! presence.heartbeat(&alice, true);
//! let statuses = presence.status_of([&alice, &bob]);
//!
//! let mailbox = Mailbox::new();
//! mailbox.enqueue(message);
//! let pending = mailbox.drain("bob");
//! ```

pub mod mailbox;
pub mod presence;
pub mod typing;

pub use mailbox::{Mailbox, MailboxWaiter};
pub use presence::{PresenceEntry, PresenceStore};
pub use typing::TypingStore;
