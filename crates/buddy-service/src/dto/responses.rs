//! Response DTOs for API endpoints
//!
//! Every success body carries `ok: true`.

use buddy_core::{Message, PresenceStatus, ScreenName};
use serde::Serialize;
use std::collections::BTreeMap;

/// Bare acknowledgement
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub ok: bool,
}

impl AckResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Status query response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub ok: bool,
    pub statuses: BTreeMap<ScreenName, PresenceStatus>,
}

impl StatusResponse {
    #[must_use]
    pub fn new(statuses: BTreeMap<ScreenName, PresenceStatus>) -> Self {
        Self { ok: true, statuses }
    }
}

/// Long-poll response; `messages` is empty on timeout
#[derive(Debug, Serialize)]
pub struct PollResponse {
    pub ok: bool,
    pub messages: Vec<Message>,
}

impl PollResponse {
    #[must_use]
    pub fn new(messages: Vec<Message>) -> Self {
        Self { ok: true, messages }
    }
}

/// Current typers response
#[derive(Debug, Serialize)]
pub struct TypingResponse {
    pub ok: bool,
    pub typing: Vec<ScreenName>,
}

impl TypingResponse {
    #[must_use]
    pub fn new(typing: Vec<ScreenName>) -> Self {
        Self { ok: true, typing }
    }
}

/// Liveness response with store gauges
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub presences: usize,
    pub mailboxes: usize,
    pub pending_messages: usize,
    pub typing_markers: usize,
}
