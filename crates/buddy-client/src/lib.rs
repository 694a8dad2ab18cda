//! # buddy-client
//!
//! Client side of the presence protocol: a background sync worker that keeps
//! the caller online, refreshes buddy statuses and typing signals, and
//! long-polls for messages, reporting everything to the UI over a channel.

pub mod activity;
pub mod api;
pub mod backoff;
pub mod config;
pub mod error;
pub mod worker;

pub use activity::ActivityTracker;
pub use api::{HttpPresenceClient, PresenceApi};
pub use backoff::Backoff;
pub use config::{ClientEnv, SyncConfig};
pub use error::{ClientError, ClientResult};
pub use worker::{ConnectionState, SyncEvent, SyncHandle, SyncWorker};
