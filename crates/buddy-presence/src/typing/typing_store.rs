//! Typing markers with a short TTL.
//!
//! Expiry is checked when reading; [`TypingStore::purge_expired`] drops dead
//! markers in bulk and is safe to call from a periodic sweeper.

use buddy_common::PresenceConfig;
use buddy_core::{ScreenName, SharedClock};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

/// "Is typing" markers keyed by screen name
pub struct TypingStore {
    markers: DashMap<ScreenName, DateTime<Utc>>,
    clock: SharedClock,
    ttl: Duration,
}

impl TypingStore {
    /// Create an empty typing store
    #[must_use]
    pub fn new(clock: SharedClock, config: &PresenceConfig) -> Self {
        Self {
            markers: DashMap::new(),
            clock,
            ttl: config.typing_ttl(),
        }
    }

    /// Mark `name` as typing until now + ttl; returns the expiry
    pub fn mark_typing(&self, name: &ScreenName) -> DateTime<Utc> {
        let expires_at = self.clock.now() + self.ttl;
        self.markers.insert(name.clone(), expires_at);
        expires_at
    }

    /// Drop `name`'s marker (e.g. once the message is sent)
    pub fn clear(&self, name: &str) -> bool {
        self.markers.remove(name).is_some()
    }

    /// Check if `name` currently holds a live marker
    pub fn is_typing(&self, name: &str) -> bool {
        let now = self.clock.now();
        self.markers
            .get(name)
            .is_some_and(|expires_at| *expires_at > now)
    }

    /// Every live marker except the caller's own, sorted by name
    pub fn current_typers(&self, excluding: &str) -> Vec<ScreenName> {
        let now = self.clock.now();
        let mut typers: Vec<ScreenName> = self
            .markers
            .iter()
            .filter(|marker| *marker.value() > now && marker.key().as_str() != excluding)
            .map(|marker| marker.key().clone())
            .collect();
        typers.sort();
        typers
    }

    /// Remove expired markers; returns how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.markers.len();
        self.markers.retain(|_, expires_at| *expires_at > now);
        let purged = before.saturating_sub(self.markers.len());

        if purged > 0 {
            tracing::debug!(purged, "Purged expired typing markers");
        }

        purged
    }

    /// Number of stored markers, expired or not
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Check if no markers are stored
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl std::fmt::Debug for TypingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypingStore")
            .field("markers", &self.markers.len())
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddy_core::ManualClock;
    use std::sync::Arc;

    fn setup() -> (Arc<ManualClock>, TypingStore) {
        let clock = ManualClock::new(Utc::now());
        let store = TypingStore::new(clock.clone(), &PresenceConfig::default());
        (clock, store)
    }

    fn name(s: &str) -> ScreenName {
        ScreenName::parse(s).unwrap()
    }

    #[test]
    fn test_marker_lives_for_ttl() {
        let (clock, store) = setup();
        store.mark_typing(&name("alice"));

        clock.advance(Duration::seconds(4));
        assert_eq!(store.current_typers("bob"), vec![name("alice")]);

        clock.advance(Duration::seconds(2));
        assert!(store.current_typers("bob").is_empty());
    }

    #[test]
    fn test_excludes_caller() {
        let (_clock, store) = setup();
        store.mark_typing(&name("alice"));
        store.mark_typing(&name("bob"));

        assert_eq!(store.current_typers("alice"), vec![name("bob")]);
        assert_eq!(store.current_typers("carol"), vec![name("alice"), name("bob")]);
    }

    #[test]
    fn test_refresh_extends_marker() {
        let (clock, store) = setup();
        store.mark_typing(&name("alice"));

        clock.advance(Duration::seconds(4));
        store.mark_typing(&name("alice"));
        clock.advance(Duration::seconds(4));

        assert!(store.is_typing("alice"));
    }

    #[test]
    fn test_clear() {
        let (_clock, store) = setup();
        store.mark_typing(&name("alice"));

        assert!(store.clear("alice"));
        assert!(!store.is_typing("alice"));
        assert!(!store.clear("alice"));
    }

    #[test]
    fn test_purge_expired() {
        let (clock, store) = setup();
        store.mark_typing(&name("alice"));
        clock.advance(Duration::seconds(3));
        store.mark_typing(&name("bob"));

        clock.advance(Duration::seconds(3));
        // Lazy expiry leaves both stored until purged
        assert_eq!(store.len(), 2);
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.is_typing("bob"));
    }
}
