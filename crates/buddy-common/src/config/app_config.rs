//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub session: SessionConfig,
    pub presence: PresenceConfig,
    pub messaging: MessagingConfig,
    pub http: HttpConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(format!("unknown environment {other:?}")),
        }
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Session token configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    #[serde(default = "default_token_expiry")]
    pub token_expiry: i64,
}

/// Presence and typing windows
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceConfig {
    /// A heartbeat younger than this keeps a user online
    #[serde(default = "default_online_window")]
    pub online_window_secs: u64,
    /// Inactivity longer than this turns an online user away
    #[serde(default = "default_idle_window")]
    pub idle_window_secs: u64,
    /// Lifetime of a typing marker
    #[serde(default = "default_typing_ttl")]
    pub typing_ttl_secs: u64,
}

/// Longest accepted presence or typing window (one week)
pub const MAX_PRESENCE_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

impl PresenceConfig {
    #[must_use]
    pub fn online_window(&self) -> chrono::Duration {
        window(self.online_window_secs)
    }

    #[must_use]
    pub fn idle_window(&self) -> chrono::Duration {
        window(self.idle_window_secs)
    }

    #[must_use]
    pub fn typing_ttl(&self) -> chrono::Duration {
        window(self.typing_ttl_secs)
    }
}

/// Seconds as a chrono duration, clamped so the conversion cannot overflow
fn window(secs: u64) -> chrono::Duration {
    chrono::Duration::seconds(secs.min(MAX_PRESENCE_WINDOW_SECS) as i64)
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            online_window_secs: default_online_window(),
            idle_window_secs: default_idle_window(),
            typing_ttl_secs: default_typing_ttl(),
        }
    }
}

/// Message delivery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingConfig {
    /// Upper bound on any long-poll, whatever the client asks for
    #[serde(default = "default_max_poll_timeout")]
    pub max_poll_timeout_secs: u64,
    /// Long-poll timeout used when the request names none
    #[serde(default = "default_poll_timeout")]
    pub default_poll_timeout_secs: u64,
    /// Mailbox recheck interval while a long-poll waits
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Maximum message content length in characters
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,
}

impl MessagingConfig {
    #[must_use]
    pub fn max_poll_timeout(&self) -> Duration {
        Duration::from_secs(self.max_poll_timeout_secs)
    }

    #[must_use]
    pub fn default_poll_timeout(&self) -> Duration {
        Duration::from_secs(self.default_poll_timeout_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            max_poll_timeout_secs: default_max_poll_timeout(),
            default_poll_timeout_secs: default_poll_timeout(),
            poll_interval_ms: default_poll_interval(),
            max_content_length: default_max_content_length(),
        }
    }
}

/// HTTP layer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Must stay above the long-poll cap or polls get cut short
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl HttpConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Rate limiting configuration
///
/// Limits apply per authenticated session, not to the server as a whole. A
/// sync client sustains a little over one request per second.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Sustained requests per second for one session
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    /// Requests one session may make in a burst
    #[serde(default = "default_burst")]
    pub burst: u32,
}

impl RateLimitConfig {
    /// Interval after which one request of the quota is replenished
    #[must_use]
    pub fn replenish_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.requests_per_second.max(1)))
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst: default_burst(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "buddy-presence".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_token_expiry() -> i64 {
    86400 // 1 day
}

fn default_online_window() -> u64 {
    20
}

fn default_idle_window() -> u64 {
    300 // 5 minutes
}

fn default_typing_ttl() -> u64 {
    5
}

fn default_max_poll_timeout() -> u64 {
    30
}

fn default_poll_timeout() -> u64 {
    25
}

fn default_poll_interval() -> u64 {
    400
}

fn default_max_content_length() -> usize {
    4000
}

fn default_request_timeout() -> u64 {
    45
}

fn default_requests_per_second() -> u32 {
    5
}

fn default_burst() -> u32 {
    20
}

/// Read an optional variable, falling back to `default` when unset
fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        Err(_) => Ok(default),
    }
}

impl AppConfig {
    /// Build a development configuration with every default and the given secret
    #[must_use]
    pub fn development(secret: impl Into<String>) -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::Development,
            },
            api: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            session: SessionConfig {
                secret: secret.into(),
                token_expiry: default_token_expiry(),
            },
            presence: PresenceConfig::default(),
            messaging: MessagingConfig::default(),
            http: HttpConfig::default(),
            rate_limit: RateLimitConfig::default(),
            cors: CorsConfig::default(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value fails to parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env_or("APP_ENV", Environment::default())?,
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: env_or("API_PORT", default_port())?,
            },
            session: SessionConfig {
                secret: env::var("SESSION_SECRET")
                    .map_err(|_| ConfigError::MissingVar("SESSION_SECRET"))?,
                token_expiry: env_or("SESSION_TOKEN_EXPIRY", default_token_expiry())?,
            },
            presence: PresenceConfig {
                online_window_secs: env_or("PRESENCE_ONLINE_WINDOW_SECS", default_online_window())?,
                idle_window_secs: env_or("PRESENCE_IDLE_WINDOW_SECS", default_idle_window())?,
                typing_ttl_secs: env_or("PRESENCE_TYPING_TTL_SECS", default_typing_ttl())?,
            },
            messaging: MessagingConfig {
                max_poll_timeout_secs: env_or("POLL_MAX_TIMEOUT_SECS", default_max_poll_timeout())?,
                default_poll_timeout_secs: env_or("POLL_DEFAULT_TIMEOUT_SECS", default_poll_timeout())?,
                poll_interval_ms: env_or("POLL_INTERVAL_MS", default_poll_interval())?,
                max_content_length: env_or("MESSAGE_MAX_LENGTH", default_max_content_length())?,
            },
            http: HttpConfig {
                request_timeout_secs: env_or("HTTP_REQUEST_TIMEOUT_SECS", default_request_timeout())?,
            },
            rate_limit: RateLimitConfig {
                requests_per_second: env_or("RATE_LIMIT_REQUESTS_PER_SECOND", default_requests_per_second())?,
                burst: env_or("RATE_LIMIT_BURST", default_burst())?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    /// Returns an error if the values cannot work together
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.messaging.max_poll_timeout_secs >= self.http.request_timeout_secs {
            return Err(ConfigError::InvalidValue(
                "HTTP_REQUEST_TIMEOUT_SECS",
                format!(
                    "{} must exceed the long-poll cap of {}s",
                    self.http.request_timeout_secs, self.messaging.max_poll_timeout_secs
                ),
            ));
        }
        if self.messaging.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue("POLL_INTERVAL_MS", "0".to_string()));
        }
        for (key, secs) in [
            ("PRESENCE_ONLINE_WINDOW_SECS", self.presence.online_window_secs),
            ("PRESENCE_IDLE_WINDOW_SECS", self.presence.idle_window_secs),
            ("PRESENCE_TYPING_TTL_SECS", self.presence.typing_ttl_secs),
        ] {
            if secs == 0 || secs > MAX_PRESENCE_WINDOW_SECS {
                return Err(ConfigError::InvalidValue(
                    key,
                    format!("{secs} must be between 1 and {MAX_PRESENCE_WINDOW_SECS}"),
                ));
            }
        }
        if !(1..=1000).contains(&self.rate_limit.requests_per_second) {
            return Err(ConfigError::InvalidValue(
                "RATE_LIMIT_REQUESTS_PER_SECOND",
                format!("{} must be between 1 and 1000", self.rate_limit.requests_per_second),
            ));
        }
        if self.rate_limit.burst == 0 {
            return Err(ConfigError::InvalidValue("RATE_LIMIT_BURST", "0".to_string()));
        }
        if self.session.secret.is_empty() {
            return Err(ConfigError::MissingVar("SESSION_SECRET"));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
