//! Cached access to the IANA bootstrap registries.
//!
//! One slot per registry. A fresh slot is served without network access; a
//! missing or expired slot triggers a fetch. When the fetch fails and an
//! older document is still in the slot, that document is served instead of
//! the error.
//!
//! Refreshes of the same registry are serialized, so concurrent misses
//! collapse into a single fetch.

use async_trait::async_trait;
use dashmap::DashMap;
use futures_util::future::join_all;
use rdap_core::{BootstrapDocument, BootstrapKind, RdapError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::cache::CacheEntry;
use crate::clock::Clock;
use crate::client::RdapClient;

/// Bootstrap documents are considered fresh for a day
pub const DEFAULT_BOOTSTRAP_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Something that can fetch a bootstrap registry
#[async_trait]
pub trait BootstrapSource: Send + Sync {
    /// Fetch and parse the registry for `kind`
    async fn fetch(&self, kind: BootstrapKind) -> Result<BootstrapDocument>;
}

#[async_trait]
impl BootstrapSource for RdapClient {
    async fn fetch(&self, kind: BootstrapKind) -> Result<BootstrapDocument> {
        self.fetch_bootstrap(kind).await
    }
}

/// Per-registry document cache with stale fallback
pub struct BootstrapRegistry {
    source: Arc<dyn BootstrapSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    slots: DashMap<BootstrapKind, CacheEntry<Arc<BootstrapDocument>>>,
    refresh_locks: [Mutex<()>; 4],
}

impl std::fmt::Debug for BootstrapRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapRegistry")
            .field("ttl", &self.ttl)
            .field("cached", &self.cached_kinds())
            .finish_non_exhaustive()
    }
}

impl BootstrapRegistry {
    /// Create an empty registry with the default one-day TTL
    #[must_use]
    pub fn new(source: Arc<dyn BootstrapSource>, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(source, clock, DEFAULT_BOOTSTRAP_TTL)
    }

    /// Create an empty registry with a custom TTL
    #[must_use]
    pub fn with_ttl(source: Arc<dyn BootstrapSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            ttl,
            slots: DashMap::new(),
            refresh_locks: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    /// Get the document for `kind`, fetching it if missing or expired.
    ///
    /// Fails with [`RdapError::BootstrapUnavailable`] only when the fetch
    /// fails and nothing, not even a stale copy, is cached.
    #[instrument(skip(self))]
    pub async fn get(&self, kind: BootstrapKind) -> Result<Arc<BootstrapDocument>> {
        if let Some(document) = self.fresh(kind) {
            debug!("bootstrap cache hit");
            return Ok(document);
        }

        let _guard = self.refresh_locks[slot_index(kind)].lock().await;

        // Another task may have refreshed the slot while we waited.
        if let Some(document) = self.fresh(kind) {
            debug!("bootstrap refreshed by a concurrent request");
            return Ok(document);
        }

        match self.source.fetch(kind).await {
            Ok(document) => {
                info!(services = document.services.len(), "bootstrap registry refreshed");
                let document = Arc::new(document);
                let entry = CacheEntry::new(Arc::clone(&document), self.clock.now(), self.ttl);
                self.slots.insert(kind, entry);
                Ok(document)
            }
            Err(err) => match self.stale(kind) {
                Some(document) => {
                    warn!(error = %err, "bootstrap fetch failed, serving stale copy");
                    Ok(document)
                }
                None => Err(RdapError::BootstrapUnavailable {
                    kind,
                    reason: err.to_string(),
                }),
            },
        }
    }

    /// Fetch every registry concurrently.
    ///
    /// Returns the failures, if any, keyed by registry.
    pub async fn prefetch_all(&self) -> Vec<(BootstrapKind, RdapError)> {
        let results = join_all(BootstrapKind::ALL.map(|kind| async move { (kind, self.get(kind).await) })).await;
        results
            .into_iter()
            .filter_map(|(kind, result)| result.err().map(|err| (kind, err)))
            .collect()
    }

    /// Registries that currently hold a document, fresh or stale
    #[must_use]
    pub fn cached_kinds(&self) -> Vec<BootstrapKind> {
        let mut kinds: Vec<_> = self.slots.iter().map(|slot| *slot.key()).collect();
        kinds.sort();
        kinds
    }

    /// Forget the cached document for `kind`
    pub fn invalidate(&self, kind: BootstrapKind) {
        self.slots.remove(&kind);
    }

    fn fresh(&self, kind: BootstrapKind) -> Option<Arc<BootstrapDocument>> {
        let now = self.clock.now();
        self.slots
            .get(&kind)
            .filter(|slot| !slot.is_expired(now))
            .map(|slot| Arc::clone(&slot.value))
    }

    fn stale(&self, kind: BootstrapKind) -> Option<Arc<BootstrapDocument>> {
        self.slots.get(&kind).map(|slot| Arc::clone(&slot.value))
    }
}

const fn slot_index(kind: BootstrapKind) -> usize {
    match kind {
        BootstrapKind::Dns => 0,
        BootstrapKind::Ipv4 => 1,
        BootstrapKind::Ipv6 => 2,
        BootstrapKind::Asn => 3,
    }
}
