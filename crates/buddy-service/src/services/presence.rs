//! Presence service
//!
//! Records heartbeats and answers status queries for lists of screen names.

use std::collections::BTreeMap;

use buddy_core::{PresenceStatus, ScreenName};
use buddy_presence::PresenceEntry;
use tracing::{debug, instrument};

use crate::dto::HeartbeatRequest;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Upper bound on names in a single status query
pub const MAX_STATUS_NAMES: usize = 500;

/// Presence service
pub struct PresenceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PresenceService<'a> {
    /// Create a new PresenceService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record a heartbeat for the authenticated caller
    #[instrument(skip(self, request), fields(screen_name = %name))]
    pub fn heartbeat(&self, name: &ScreenName, request: &HeartbeatRequest) -> PresenceEntry {
        let active = request.is_active();
        let entry = self.ctx.presence_store().heartbeat(name, active);
        debug!(active, "Heartbeat recorded");
        entry
    }

    /// Resolve a comma-separated list of names to their statuses
    ///
    /// Blank segments are skipped and duplicates collapse. A missing or empty
    /// list yields an empty map.
    #[instrument(skip(self))]
    pub fn statuses(
        &self,
        names: Option<&str>,
    ) -> ServiceResult<BTreeMap<ScreenName, PresenceStatus>> {
        let requested = parse_name_list(names.unwrap_or_default())?;
        let statuses = self.ctx.presence_store().status_of(&requested);
        Ok(statuses.into_iter().collect())
    }
}

fn parse_name_list(raw: &str) -> ServiceResult<Vec<ScreenName>> {
    let mut names = Vec::new();
    for segment in raw.split(',') {
        if segment.trim().is_empty() {
            continue;
        }
        names.push(ScreenName::parse(segment)?);
        if names.len() > MAX_STATUS_NAMES {
            return Err(ServiceError::validation(format!(
                "at most {MAX_STATUS_NAMES} names per query"
            )));
        }
    }
    Ok(names)
}
