//! In-memory presence store.
//!
//! One entry per screen name, created on the first heartbeat and overwritten
//! by every later one. Entries are never deleted; a silent user simply ages
//! out of the online window.

use buddy_common::PresenceConfig;
use buddy_core::{PresenceStatus, ScreenName, SharedClock};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use std::collections::HashMap;

/// Heartbeat bookkeeping for one screen name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresenceEntry {
    pub screen_name: ScreenName,
    pub last_heartbeat: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl PresenceEntry {
    /// Derive the status at `now`
    #[must_use]
    pub fn status_at(
        &self,
        now: DateTime<Utc>,
        online_window: Duration,
        idle_window: Duration,
    ) -> PresenceStatus {
        if now - self.last_heartbeat >= online_window {
            PresenceStatus::Offline
        } else if now - self.last_active >= idle_window {
            PresenceStatus::Away
        } else {
            PresenceStatus::Online
        }
    }
}

/// Presence store keyed by screen name
pub struct PresenceStore {
    entries: DashMap<ScreenName, PresenceEntry>,
    clock: SharedClock,
    online_window: Duration,
    idle_window: Duration,
}

impl PresenceStore {
    /// Create an empty presence store
    #[must_use]
    pub fn new(clock: SharedClock, config: &PresenceConfig) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
            online_window: config.online_window(),
            idle_window: config.idle_window(),
        }
    }

    /// Record a heartbeat
    ///
    /// `last_active` moves only when `active` is set, except on the first
    /// heartbeat where it starts equal to `last_heartbeat`.
    pub fn heartbeat(&self, name: &ScreenName, active: bool) -> PresenceEntry {
        let now = self.clock.now();

        let entry = self
            .entries
            .entry(name.clone())
            .and_modify(|entry| {
                entry.last_heartbeat = now;
                if active {
                    entry.last_active = now;
                }
            })
            .or_insert_with(|| PresenceEntry {
                screen_name: name.clone(),
                last_heartbeat: now,
                last_active: now,
            })
            .clone();

        tracing::trace!(screen_name = %name, active, "Heartbeat recorded");

        entry
    }

    /// Get the raw entry for a screen name
    pub fn entry(&self, name: &str) -> Option<PresenceEntry> {
        self.entries.get(name).map(|e| e.clone())
    }

    /// Status for one screen name; unknown names are offline
    pub fn status(&self, name: &str) -> PresenceStatus {
        let now = self.clock.now();
        self.entries
            .get(name)
            .map_or(PresenceStatus::Offline, |entry| {
                entry.status_at(now, self.online_window, self.idle_window)
            })
    }

    /// Status for every requested name, all evaluated against the same instant
    pub fn status_of<'a, I>(&self, names: I) -> HashMap<ScreenName, PresenceStatus>
    where
        I: IntoIterator<Item = &'a ScreenName>,
    {
        let now = self.clock.now();
        names
            .into_iter()
            .map(|name| {
                let status = self
                    .entries
                    .get(name.as_str())
                    .map_or(PresenceStatus::Offline, |entry| {
                        entry.status_at(now, self.online_window, self.idle_window)
                    });
                (name.clone(), status)
            })
            .collect()
    }

    /// Number of screen names ever seen
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no heartbeat was ever recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for PresenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresenceStore")
            .field("entries", &self.entries.len())
            .field("online_window", &self.online_window)
            .field("idle_window", &self.idle_window)
            .finish_non_exhaustive()
    }
}
