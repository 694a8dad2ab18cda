//! Service context - dependency container for services
//!
//! Holds the in-memory stores, the session-token verifier, the clock, and
//! the messaging limits. Stores are owned here and injected into handlers;
//! nothing lives in a process-wide global.

use std::sync::Arc;

use buddy_common::{AppConfig, MessagingConfig, PresenceConfig, SessionTokens};
use buddy_core::{SharedClock, SystemClock};
use buddy_presence::{Mailbox, PresenceStore, TypingStore};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cheap to clone; every store is behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Stores
    presence_store: Arc<PresenceStore>,
    mailbox: Arc<Mailbox>,
    typing_store: Arc<TypingStore>,

    // Services
    session_tokens: Arc<SessionTokens>,
    clock: SharedClock,

    // Limits
    messaging: MessagingConfig,
}

impl ServiceContext {
    /// Build a context with fresh stores from application configuration
    pub fn from_config(config: &AppConfig) -> ServiceResult<Self> {
        ServiceContextBuilder::new()
            .presence_config(config.presence.clone())
            .messaging_config(config.messaging.clone())
            .session_tokens(Arc::new(SessionTokens::new(
                &config.session.secret,
                config.session.token_expiry,
            )))
            .build()
    }

    pub fn presence_store(&self) -> &PresenceStore {
        &self.presence_store
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    pub fn typing_store(&self) -> &TypingStore {
        &self.typing_store
    }

    pub fn session_tokens(&self) -> &SessionTokens {
        &self.session_tokens
    }

    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    pub fn messaging(&self) -> &MessagingConfig {
        &self.messaging
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("presence_store", &self.presence_store)
            .field("mailbox_recipients", &self.mailbox.recipients())
            .field("typing_store", &self.typing_store)
            .field("messaging", &self.messaging)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ServiceContext`]
///
/// Stores left unset are created empty, reading time from the builder's
/// clock (the system clock unless one is supplied).
pub struct ServiceContextBuilder {
    presence_store: Option<Arc<PresenceStore>>,
    mailbox: Option<Arc<Mailbox>>,
    typing_store: Option<Arc<TypingStore>>,
    session_tokens: Option<Arc<SessionTokens>>,
    clock: Option<SharedClock>,
    presence_config: PresenceConfig,
    messaging_config: MessagingConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            presence_store: None,
            mailbox: None,
            typing_store: None,
            session_tokens: None,
            clock: None,
            presence_config: PresenceConfig::default(),
            messaging_config: MessagingConfig::default(),
        }
    }

    pub fn presence_store(mut self, store: Arc<PresenceStore>) -> Self {
        self.presence_store = Some(store);
        self
    }

    pub fn mailbox(mut self, mailbox: Arc<Mailbox>) -> Self {
        self.mailbox = Some(mailbox);
        self
    }

    pub fn typing_store(mut self, store: Arc<TypingStore>) -> Self {
        self.typing_store = Some(store);
        self
    }

    pub fn session_tokens(mut self, tokens: Arc<SessionTokens>) -> Self {
        self.session_tokens = Some(tokens);
        self
    }

    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn presence_config(mut self, config: PresenceConfig) -> Self {
        self.presence_config = config;
        self
    }

    pub fn messaging_config(mut self, config: MessagingConfig) -> Self {
        self.messaging_config = config;
        self
    }

    pub fn build(self) -> ServiceResult<ServiceContext> {
        let session_tokens = self
            .session_tokens
            .ok_or_else(|| ServiceError::validation("session_tokens is required"))?;
        if self.messaging_config.poll_interval_ms == 0 {
            return Err(ServiceError::validation("poll interval must be positive"));
        }

        let clock = self.clock.unwrap_or_else(SystemClock::shared);
        let presence_config = self.presence_config;

        Ok(ServiceContext {
            presence_store: self.presence_store.unwrap_or_else(|| {
                Arc::new(PresenceStore::new(clock.clone(), &presence_config))
            }),
            mailbox: self.mailbox.unwrap_or_default(),
            typing_store: self
                .typing_store
                .unwrap_or_else(|| Arc::new(TypingStore::new(clock.clone(), &presence_config))),
            session_tokens,
            clock,
            messaging: self.messaging_config,
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
