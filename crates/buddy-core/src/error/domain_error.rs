//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain rule violations; every one is the caller's fault
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid screen name: {0}")]
    InvalidScreenName(String),

    #[error("Message content is empty")]
    EmptyContent,

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Invalid status: {0}")]
    InvalidStatus(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidScreenName(_) => "INVALID_SCREEN_NAME",
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::InvalidStatus(_) => "INVALID_STATUS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::InvalidScreenName("a,b".to_string());
        assert_eq!(err.code(), "INVALID_SCREEN_NAME");

        assert_eq!(DomainError::EmptyContent.code(), "EMPTY_CONTENT");
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::ContentTooLong { max: 4000 };
        assert_eq!(err.to_string(), "Content too long: max 4000 characters");
    }
}
