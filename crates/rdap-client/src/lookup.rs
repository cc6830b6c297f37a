//! The lookup pipeline tying classification, bootstrap discovery, caching
//! and rate limiting together.

use chrono::{DateTime, Utc};
use rdap_core::{classify, normalize, resolve_target, RdapError, ResolvedTarget, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::bootstrap::{BootstrapRegistry, BootstrapSource};
use crate::cache::TtlCache;
use crate::client::RdapClient;
use crate::clock::{Clock, SystemClock};
use crate::config::LookupConfig;
use crate::rate_limit::{RateLimitDecision, RateLimiter};

/// Payload key carrying the classified query type
pub const QUERY_TYPE_KEY: &str = "_queryType";

/// Payload key carrying the query as submitted
pub const QUERY_KEY: &str = "_query";

/// Whether a response came from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CacheStatus {
    /// Served from the response cache
    Hit,
    /// Fetched from the authoritative server
    Miss,
}

impl CacheStatus {
    /// Header value (`HIT` / `MISS`)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
        }
    }
}

/// A successful lookup
#[derive(Debug, Clone)]
pub struct LookupResponse {
    /// RDAP payload with `_queryType` and `_query` attached. Shared with the
    /// cache, so treat it as read-only.
    pub payload: Arc<Value>,

    /// Cache hit or miss
    pub cache: CacheStatus,

    /// Rate-limit bookkeeping; absent on cache hits, which are not counted
    pub rate_limit: Option<RateLimitDecision>,
}

impl LookupResponse {
    /// Response headers describing cache and rate-limit state
    #[must_use]
    pub fn headers(&self, now: DateTime<Utc>) -> Vec<(&'static str, String)> {
        let mut headers = vec![("X-Cache", self.cache.as_str().to_string())];
        if let Some(decision) = &self.rate_limit {
            headers.extend(decision.headers(now));
        }
        headers
    }
}

/// RDAP lookup pipeline.
///
/// Owns the response cache, rate limiter and bootstrap registry. Build one
/// per process and share it; it is cheap to clone.
#[derive(Clone, Debug)]
pub struct RdapLookup {
    inner: Arc<LookupInner>,
}

#[derive(Debug)]
struct LookupInner {
    client: RdapClient,
    bootstrap: BootstrapRegistry,
    cache: TtlCache<Arc<Value>>,
    limiter: RateLimiter,
    clock: Arc<dyn Clock>,
    config: LookupConfig,
}

impl RdapLookup {
    /// Create a pipeline with the system clock and fresh stores
    pub fn new(config: LookupConfig) -> Result<Self> {
        RdapLookupBuilder::new(config).build()
    }

    /// Create a builder for injecting a clock, client or bootstrap source
    #[must_use]
    pub fn builder(config: LookupConfig) -> RdapLookupBuilder {
        RdapLookupBuilder::new(config)
    }

    /// Look up `query` on behalf of `client_id`.
    ///
    /// Cache hits return immediately and do not count against the rate
    /// limit. Misses are rate-limited, resolved through the bootstrap
    /// registry, fetched, annotated and cached. Errors are never cached.
    #[instrument(skip(self))]
    pub async fn lookup(&self, query: &str, client_id: &str) -> Result<LookupResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RdapError::Validation("query parameter is required".into()));
        }

        let key = cache_key(query);
        if let Some(payload) = self.inner.cache.get(&key) {
            debug!("response cache hit");
            return Ok(LookupResponse {
                payload,
                cache: CacheStatus::Hit,
                rate_limit: None,
            });
        }

        let limits = self.inner.config.rate_limit;
        let decision = self
            .inner
            .limiter
            .check(client_id, limits.limit, limits.window());
        if !decision.allowed {
            return Err(RdapError::RateLimited {
                limit: decision.limit,
                reset_at: decision.reset_at,
            });
        }

        let target = self.resolve(query).await?;
        let Some(server) = target.rdap_server.as_deref() else {
            return Err(RdapError::NoServerFound {
                query_type: target.query_type,
                query: target.normalized_query,
            });
        };

        let mut payload = self.inner.client.query(server, &target.rdap_path).await?;
        annotate(&mut payload, &target, query);

        let payload = Arc::new(payload);
        self.inner.cache.set(
            key,
            Arc::clone(&payload),
            self.inner.config.response_ttl_duration(),
        );

        Ok(LookupResponse {
            payload,
            cache: CacheStatus::Miss,
            rate_limit: Some(decision),
        })
    }

    /// Classify and resolve `query` without querying the RDAP server.
    ///
    /// The returned target has no server when no bootstrap service matched.
    pub async fn resolve(&self, query: &str) -> Result<ResolvedTarget> {
        let query = query.trim();
        let query_type = classify(query);
        let normalized = normalize(query_type, query);
        let bootstrap = self.inner.bootstrap.get(query_type.bootstrap_kind()).await?;

        let target = resolve_target(query_type, &normalized, &bootstrap);
        debug!(
            query_type = %target.query_type,
            server = target.rdap_server.as_deref().unwrap_or("-"),
            "resolved target"
        );
        Ok(target)
    }

    /// The bootstrap registry backing this pipeline
    #[must_use]
    pub fn bootstrap(&self) -> &BootstrapRegistry {
        &self.inner.bootstrap
    }

    /// The response cache
    #[must_use]
    pub fn cache(&self) -> &TtlCache<Arc<Value>> {
        &self.inner.cache
    }

    /// The per-client rate limiter
    #[must_use]
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.inner.limiter
    }

    /// The clock shared by all stores
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.inner.clock
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &LookupConfig {
        &self.inner.config
    }
}

/// Builder for configuring an [`RdapLookup`]
pub struct RdapLookupBuilder {
    config: LookupConfig,
    clock: Option<Arc<dyn Clock>>,
    client: Option<RdapClient>,
    bootstrap_source: Option<Arc<dyn BootstrapSource>>,
}

impl RdapLookupBuilder {
    /// Create a builder from a configuration
    #[must_use]
    pub fn new(config: LookupConfig) -> Self {
        Self {
            config,
            clock: None,
            client: None,
            bootstrap_source: None,
        }
    }

    /// Use a specific clock for every store
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Use a preconfigured HTTP client
    #[must_use]
    pub fn client(mut self, client: RdapClient) -> Self {
        self.client = Some(client);
        self
    }

    /// Fetch bootstrap documents from somewhere other than the HTTP client
    #[must_use]
    pub fn bootstrap_source(mut self, source: Arc<dyn BootstrapSource>) -> Self {
        self.bootstrap_source = Some(source);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Result<RdapLookup> {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let client = match self.client {
            Some(client) => client,
            None => RdapClient::builder()
                .bootstrap_base_url(self.config.bootstrap_base_url.clone())
                .outbound_rps(self.config.outbound_rps)
                .build()?,
        };
        let source = self
            .bootstrap_source
            .unwrap_or_else(|| Arc::new(client.clone()));

        Ok(RdapLookup {
            inner: Arc::new(LookupInner {
                bootstrap: BootstrapRegistry::with_ttl(
                    source,
                    Arc::clone(&clock),
                    self.config.bootstrap_ttl_duration(),
                ),
                cache: TtlCache::new(Arc::clone(&clock)),
                limiter: RateLimiter::new(Arc::clone(&clock)),
                client,
                clock,
                config: self.config,
            }),
        })
    }
}

/// Cache key for a trimmed query.
///
/// Case-insensitive, so a hit returns the payload annotated with the
/// casing of the query that populated it.
fn cache_key(query: &str) -> String {
    format!("rdap:{}", query.to_lowercase())
}

/// Attach the query metadata to an object payload.
fn annotate(payload: &mut Value, target: &ResolvedTarget, query: &str) {
    if let Value::Object(map) = payload {
        map.insert(
            QUERY_TYPE_KEY.to_string(),
            Value::String(target.query_type.as_str().to_string()),
        );
        map.insert(QUERY_KEY.to_string(), Value::String(query.to_string()));
    }
}
