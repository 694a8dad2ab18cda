//! Message entity - an instant message addressed to a single recipient

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::value_objects::ScreenName;

/// Message entity
///
/// Immutable once created. Ownership moves from the sender's request into the
/// recipient's mailbox and then to the single poll response that drains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub from: ScreenName,
    pub to: ScreenName,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_html: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new Message stamped at `timestamp`
    pub fn new(
        from: ScreenName,
        to: ScreenName,
        content: String,
        content_html: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            content,
            content_html,
            timestamp,
        }
    }
}
