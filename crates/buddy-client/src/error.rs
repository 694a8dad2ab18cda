//! Client error types
//!
//! Every failure is classified by how the sync loop reacts to it.

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Session missing, invalid, or expired; needs re-authentication
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Request rejected as malformed; retrying unchanged will not help
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network failure, timeout, or server-side error; retry with backoff
    #[error("Transient failure: {0}")]
    Transient(String),

    /// Response did not match the wire protocol
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// The server refused this exact request; resending it unchanged fails again
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Protocol(_))
    }

    /// Classify a non-success HTTP status and its error message
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Unauthorized(message),
            400 | 413 | 422 => Self::Validation(message),
            408 | 429 | 500..=599 => Self::Transient(format!("HTTP {status}: {message}")),
            _ => Self::Protocol(format!("unexpected HTTP {status}: {message}")),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Protocol(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16(), err.to_string())
        } else {
            Self::Transient(err.to_string())
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(ClientError::from_status(401, "expired").is_unauthorized());
        assert!(matches!(
            ClientError::from_status(400, "missing to"),
            ClientError::Validation(_)
        ));
        assert!(ClientError::from_status(503, "timeout").is_transient());
        assert!(ClientError::from_status(429, "slow down").is_transient());
        assert!(ClientError::from_status(400, "too many names").is_rejected());
        assert!(!ClientError::from_status(503, "timeout").is_rejected());
        assert!(matches!(
            ClientError::from_status(404, "nope"),
            ClientError::Protocol(_)
        ));
    }
}
