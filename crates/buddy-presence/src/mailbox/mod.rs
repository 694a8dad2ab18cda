//! Per-recipient message queues.

mod store;

pub use store::{Mailbox, MailboxWaiter};
