//! Screen name - the unique user identifier keying presence, mailbox, and typing state

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Validated screen name
///
/// Trimmed, 1-32 characters, no control characters and no commas
/// (commas delimit names in the status query).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScreenName(String);

impl ScreenName {
    /// Maximum length in characters
    pub const MAX_LEN: usize = 32;

    /// Parse and validate a screen name
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let name = raw.trim();

        if name.is_empty() {
            return Err(DomainError::InvalidScreenName("must not be empty".to_string()));
        }
        if name.chars().count() > Self::MAX_LEN {
            return Err(DomainError::InvalidScreenName(format!(
                "must be at most {} characters",
                Self::MAX_LEN
            )));
        }
        if name.chars().any(|c| c.is_control() || c == ',') {
            return Err(DomainError::InvalidScreenName(format!(
                "contains invalid characters: {name:?}"
            )));
        }

        Ok(Self(name.to_string()))
    }

    /// Get the name as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ScreenName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ScreenName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ScreenName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ScreenName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for ScreenName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ScreenName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
