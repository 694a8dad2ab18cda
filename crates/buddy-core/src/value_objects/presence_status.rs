//! Presence status - derived three-state reachability

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Derived presence status; never stored, always computed from timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    /// Heartbeating and recently active
    Online,
    /// Heartbeating but idle beyond the idle window
    Away,
    /// No heartbeat within the online window (or never seen)
    #[default]
    Offline,
}

impl PresenceStatus {
    /// Check if the user is reachable (online or away)
    #[must_use]
    pub fn is_reachable(&self) -> bool {
        !matches!(self, Self::Offline)
    }

    /// Wire representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Away => "away",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresenceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "away" => Ok(Self::Away),
            "offline" => Ok(Self::Offline),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_offline() {
        assert_eq!(PresenceStatus::default(), PresenceStatus::Offline);
    }

    #[test]
    fn test_display_and_parse() {
        for status in [PresenceStatus::Online, PresenceStatus::Away, PresenceStatus::Offline] {
            assert_eq!(status.to_string().parse::<PresenceStatus>().unwrap(), status);
        }
        assert!("idle".parse::<PresenceStatus>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&PresenceStatus::Away).unwrap(), "\"away\"");
    }

    #[test]
    fn test_is_reachable() {
        assert!(PresenceStatus::Online.is_reachable());
        assert!(PresenceStatus::Away.is_reachable());
        assert!(!PresenceStatus::Offline.is_reachable());
    }
}
