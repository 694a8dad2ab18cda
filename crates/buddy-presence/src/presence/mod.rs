//! Presence storage module.
//!
//! Tracks heartbeats and derives online / away / offline.

mod presence_store;

pub use presence_store::{PresenceEntry, PresenceStore};
