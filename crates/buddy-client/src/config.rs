//! Client configuration
//!
//! [`SyncConfig`] holds the worker's cadence; [`ClientEnv`] holds what the
//! console binary reads from the environment.

use std::env;
use std::time::Duration;

use buddy_common::ConfigError;
use buddy_core::ScreenName;

/// Sync worker timing and initial buddy list
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Names whose status the worker refreshes
    pub buddies: Vec<ScreenName>,
    /// Input within this window marks heartbeats active
    pub activity_window: Duration,
    /// Minimum spacing between status queries
    pub status_interval: Duration,
    /// Minimum spacing between typing queries
    pub typing_interval: Duration,
    /// Long-poll timeout; short so the loop stays responsive to stop
    pub poll_timeout: Duration,
    /// Pause after the server rejects the session
    pub unauthorized_pause: Duration,
    /// First retry delay after a failure
    pub backoff_initial: Duration,
    /// Retry delay cap
    pub backoff_max: Duration,
}

impl SyncConfig {
    pub fn with_buddies(buddies: Vec<ScreenName>) -> Self {
        Self {
            buddies,
            ..Self::default()
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            buddies: Vec::new(),
            activity_window: Duration::from_secs(60),
            status_interval: Duration::from_secs(7),
            typing_interval: Duration::from_secs(1),
            poll_timeout: Duration::from_secs(3),
            unauthorized_pause: Duration::from_secs(5),
            backoff_initial: Duration::from_secs(1),
            backoff_max: Duration::from_secs(8),
        }
    }
}

/// Connection settings for the console client
#[derive(Debug, Clone)]
pub struct ClientEnv {
    pub server_url: String,
    pub token: String,
    pub buddies: Vec<ScreenName>,
}

impl ClientEnv {
    /// Load from `BUDDY_SERVER_URL`, `BUDDY_TOKEN`, and `BUDDY_BUDDIES`
    ///
    /// # Errors
    /// Returns an error if the token is missing or a buddy name is invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let server_url = env::var("BUDDY_SERVER_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string());
        let token = env::var("BUDDY_TOKEN").map_err(|_| ConfigError::MissingVar("BUDDY_TOKEN"))?;
        let buddies = parse_buddies(&env::var("BUDDY_BUDDIES").unwrap_or_default())?;

        Ok(Self {
            server_url,
            token,
            buddies,
        })
    }
}

/// Parse a comma-separated buddy list, skipping blank entries
pub fn parse_buddies(raw: &str) -> Result<Vec<ScreenName>, ConfigError> {
    raw.split(',')
        .filter(|name| !name.trim().is_empty())
        .map(|name| {
            ScreenName::parse(name)
                .map_err(|e| ConfigError::InvalidValue("BUDDY_BUDDIES", e.to_string()))
        })
        .collect()
}
