//! Lookup configuration types.

use rdap_core::IANA_BOOTSTRAP_BASE_URL;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for an [`RdapLookup`](crate::RdapLookup) pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// How long a successful RDAP response stays cached (seconds)
    #[serde(default = "default_response_ttl")]
    pub response_ttl_secs: u64,

    /// How long a bootstrap document is considered fresh (seconds)
    #[serde(default = "default_bootstrap_ttl")]
    pub bootstrap_ttl_secs: u64,

    /// Optional cap on outbound requests per second
    #[serde(default)]
    pub outbound_rps: Option<u32>,

    /// Base URL the four bootstrap files are fetched from
    #[serde(default = "default_bootstrap_base_url")]
    pub bootstrap_base_url: String,

    /// Per-client inbound request limit
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupConfig {
    /// Create a configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self {
            response_ttl_secs: default_response_ttl(),
            bootstrap_ttl_secs: default_bootstrap_ttl(),
            rate_limit: RateLimitConfig::default(),
            outbound_rps: None,
            bootstrap_base_url: default_bootstrap_base_url(),
        }
    }

    /// Set the response cache TTL
    #[must_use]
    pub const fn response_ttl(mut self, ttl: Duration) -> Self {
        self.response_ttl_secs = ttl.as_secs();
        self
    }

    /// Set the bootstrap freshness window
    #[must_use]
    pub const fn bootstrap_ttl(mut self, ttl: Duration) -> Self {
        self.bootstrap_ttl_secs = ttl.as_secs();
        self
    }

    /// Set the inbound rate limit
    #[must_use]
    pub const fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Cap outbound requests per second
    #[must_use]
    pub const fn outbound_rps(mut self, rps: u32) -> Self {
        self.outbound_rps = Some(rps);
        self
    }

    /// Fetch bootstrap files from somewhere other than IANA (useful for testing)
    #[must_use]
    pub fn bootstrap_base_url(mut self, url: impl Into<String>) -> Self {
        self.bootstrap_base_url = url.into();
        self
    }

    /// Response cache TTL as a [`Duration`]
    #[must_use]
    pub const fn response_ttl_duration(&self) -> Duration {
        Duration::from_secs(self.response_ttl_secs)
    }

    /// Bootstrap freshness window as a [`Duration`]
    #[must_use]
    pub const fn bootstrap_ttl_duration(&self) -> Duration {
        Duration::from_secs(self.bootstrap_ttl_secs)
    }
}

/// Fixed-window request limit applied per client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests allowed per window
    pub limit: u32,

    /// Window length (seconds)
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::new(30, Duration::from_secs(60))
    }
}

impl RateLimitConfig {
    /// Create a limit of `limit` requests per `window`
    #[must_use]
    pub const fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window_secs: window.as_secs(),
        }
    }

    /// Window length as a [`Duration`]
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

// Default value functions for serde.
const fn default_response_ttl() -> u64 {
    3600
}

const fn default_bootstrap_ttl() -> u64 {
    86_400
}

fn default_bootstrap_base_url() -> String {
    IANA_BOOTSTRAP_BASE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LookupConfig::default();
        assert_eq!(config.response_ttl_secs, 3600);
        assert_eq!(config.bootstrap_ttl_duration(), Duration::from_secs(24 * 60 * 60));
        assert_eq!(config.rate_limit.limit, 30);
        assert_eq!(config.rate_limit.window(), Duration::from_secs(60));
        assert_eq!(config.bootstrap_base_url, "https://data.iana.org/rdap/");
        assert!(config.outbound_rps.is_none());
    }

    #[test]
    fn test_partial_deserialization() {
        let config: LookupConfig =
            serde_json::from_str(r#"{"response_ttl_secs": 60, "rate_limit": {"limit": 5, "window_secs": 10}}"#)
                .unwrap();
        assert_eq!(config.response_ttl_secs, 60);
        assert_eq!(config.bootstrap_ttl_secs, 86_400);
        assert_eq!(config.rate_limit, RateLimitConfig::new(5, Duration::from_secs(10)));
    }

    #[test]
    fn test_builder_methods() {
        let config = LookupConfig::new()
            .response_ttl(Duration::from_secs(5))
            .outbound_rps(10)
            .bootstrap_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.response_ttl_duration(), Duration::from_secs(5));
        assert_eq!(config.outbound_rps, Some(10));
        assert_eq!(config.bootstrap_base_url, "http://127.0.0.1:9000/");
    }
}
