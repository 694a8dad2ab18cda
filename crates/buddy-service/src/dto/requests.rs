//! Request DTOs for API endpoints
//!
//! Bodies implement `Deserialize` and `Validate`; query strings only `Deserialize`.

use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Reject strings that are empty once trimmed
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

// ============================================================================
// Presence Requests
// ============================================================================

/// Heartbeat request
///
/// An absent `active` counts as active.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct HeartbeatRequest {
    #[serde(default)]
    pub active: Option<bool>,
}

impl HeartbeatRequest {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }
}

/// Status query (`?names=a,b,c`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub names: Option<String>,
}

// ============================================================================
// Message Requests
// ============================================================================

/// Send message request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(
        length(min = 1, max = 32, message = "Recipient must be 1-32 characters"),
        custom(function = "not_blank")
    )]
    pub to: String,

    #[validate(
        length(min = 1, message = "Content is required"),
        custom(function = "not_blank")
    )]
    pub content: String,

    #[serde(default)]
    pub content_html: Option<String>,
}

/// Long-poll query (`?timeout=N`, seconds, fractions allowed)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollQuery {
    #[serde(default)]
    pub timeout: Option<f64>,
}
