//! Typing service
//!
//! Marks the caller as typing and lists everyone else who currently is.

use buddy_core::ScreenName;
use tracing::{debug, instrument};

use super::context::ServiceContext;

/// Typing service
pub struct TypingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TypingService<'a> {
    /// Create a new TypingService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Refresh the caller's marker, then list the other live typers
    #[instrument(skip(self), fields(screen_name = %name))]
    pub fn mark_and_list(&self, name: &ScreenName) -> Vec<ScreenName> {
        let expires_at = self.ctx.typing_store().mark_typing(name);
        debug!(%expires_at, "Typing marker refreshed");
        self.list(name)
    }

    /// List live typers other than the caller, without touching their marker
    pub fn list(&self, name: &ScreenName) -> Vec<ScreenName> {
        self.ctx.typing_store().current_typers(name.as_str())
    }
}
