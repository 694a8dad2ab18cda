//! Events the sync worker reports to the UI

use std::collections::BTreeMap;
use std::fmt;

use buddy_core::{Message, PresenceStatus, ScreenName};

/// Connectivity as seen by the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Started, no heartbeat answered yet
    Connecting,
    /// Last heartbeat succeeded
    Connected,
    /// Last request failed; retrying with backoff
    Reconnecting,
    /// Server rejected the session
    Unauthorized,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Reconnecting => "reconnecting",
            Self::Unauthorized => "unauthorized",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-way notification from the worker
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// Connectivity changed (never repeated for the same state)
    ConnectionChanged(ConnectionState),
    /// Fresh statuses for the buddy list
    Statuses(BTreeMap<ScreenName, PresenceStatus>),
    /// Names currently typing, excluding the caller
    Typing(Vec<ScreenName>),
    /// One delivered batch, in mailbox order
    Messages(Vec<Message>),
}
