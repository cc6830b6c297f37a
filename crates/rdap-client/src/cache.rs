//! Expire-on-read TTL cache.
//!
//! Entries are only evicted by the `get` that finds them expired; there is
//! no background sweep and no size bound.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

use crate::clock::{expiry, Clock};

/// A cached value and the instant it stops being served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<V> {
    /// The cached value
    pub value: V,
    /// Last instant the value may be returned
    pub expires_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    /// Create an entry that lives for `ttl` from `now`
    pub fn new(value: V, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: expiry(now, ttl),
        }
    }

    /// Returns true once `now` is past the expiry instant
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Concurrent key/value store with per-entry TTL.
///
/// `get` hands out clones of the stored value; store `Arc`s to share large
/// values without copying them.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache reading time from `clock`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Fetch a live value, evicting it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(now))
            .is_some()
        {
            trace!(key, "cache entry expired");
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Store `value` under `key`, replacing any previous entry and its expiry.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let entry = CacheEntry::new(value, self.clock.now(), ttl);
        self.entries.insert(key.into(), entry);
    }

    /// Drop an entry regardless of expiry
    pub fn remove(&self, key: &str) -> Option<V> {
        self.entries.remove(key).map(|(_, entry)| entry.value)
    }

    /// Number of stored entries, including expired ones not yet read
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
