//! Test fixtures and wire types
//!
//! Request bodies the tests send and the response shapes they read back.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A screen name no other test uses
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}{}", unique_suffix())
}

/// Heartbeat request
#[derive(Debug, Serialize)]
pub struct HeartbeatRequest {
    pub active: bool,
}

/// Send message request
#[derive(Debug, Serialize)]
pub struct SendRequest {
    pub to: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_html: Option<String>,
}

impl SendRequest {
    pub fn text(to: &str, content: &str) -> Self {
        Self {
            to: to.to_string(),
            content: content.to_string(),
            content_html: None,
        }
    }
}

/// `{ok: true}` acknowledgement
#[derive(Debug, Deserialize)]
pub struct AckResponse {
    pub ok: bool,
}

/// Status query response
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub ok: bool,
    pub statuses: BTreeMap<String, String>,
}

/// Delivered message
#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub id: uuid::Uuid,
    pub from: String,
    pub to: String,
    pub content: String,
    pub content_html: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Poll response
#[derive(Debug, Deserialize)]
pub struct PollResponse {
    pub ok: bool,
    pub messages: Vec<MessageBody>,
}

/// Typing response
#[derive(Debug, Deserialize)]
pub struct TypingResponse {
    pub ok: bool,
    pub typing: Vec<String>,
}

/// Error envelope
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Health response
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub presences: usize,
    pub mailboxes: usize,
    pub pending_messages: usize,
}
