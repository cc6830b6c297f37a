//! HTTP client for bootstrap registries and RDAP servers.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use rdap_core::{join_server_path, BootstrapDocument, BootstrapKind, RdapError, Result};
use reqwest::header::ACCEPT;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Media type requested from RDAP servers
pub const RDAP_CONTENT_TYPE: &str = "application/rdap+json";

/// Media type requested from the bootstrap registries
const BOOTSTRAP_CONTENT_TYPE: &str = "application/json";

/// HTTP client shared by the bootstrap registry and the lookup pipeline.
///
/// Each call is a single GET: no retries, and no timeout unless one is set
/// on the builder.
#[derive(Clone)]
pub struct RdapClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    bootstrap_base_url: String,
    throttle: Option<DefaultDirectRateLimiter>,
}

impl std::fmt::Debug for RdapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RdapClient")
            .field("bootstrap_base_url", &self.inner.bootstrap_base_url)
            .field("throttled", &self.inner.throttle.is_some())
            .finish_non_exhaustive()
    }
}

impl RdapClient {
    /// Create a client with default settings
    pub fn new() -> Result<Self> {
        RdapClientBuilder::new().build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder() -> RdapClientBuilder {
        RdapClientBuilder::new()
    }

    /// URL a bootstrap registry is fetched from
    #[must_use]
    pub fn bootstrap_url(&self, kind: BootstrapKind) -> String {
        join_server_path(&self.inner.bootstrap_base_url, kind.file_name())
    }

    /// Query an RDAP server for `path` and return the raw JSON payload.
    ///
    /// `server` is a bootstrap base URL, normally ending in `/`.
    #[instrument(skip(self))]
    pub async fn query(&self, server: &str, path: &str) -> Result<serde_json::Value> {
        let url = join_server_path(server, path);
        self.get_json(&url, RDAP_CONTENT_TYPE).await
    }

    /// Fetch and parse one bootstrap registry
    #[instrument(skip(self))]
    pub async fn fetch_bootstrap(&self, kind: BootstrapKind) -> Result<BootstrapDocument> {
        let url = self.bootstrap_url(kind);
        self.get_json(&url, BOOTSTRAP_CONTENT_TYPE).await
    }

    /// Perform a GET request and decode the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str, accept: &str) -> Result<T> {
        if let Some(throttle) = &self.inner.throttle {
            throttle.until_ready().await;
        }

        debug!(url = %url, "GET request");

        let response = self
            .inner
            .http
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .await
            .map_err(|e| RdapError::Transport(e.to_string()))?;

        self.handle_response(url, response).await
    }

    /// Handle a response that should carry JSON
    async fn handle_response<T: DeserializeOwned>(
        &self,
        url: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| RdapError::Transport(e.to_string()))?;
            serde_json::from_str(&body).map_err(RdapError::Json)
        } else {
            Self::handle_error(url, status.as_u16())
        }
    }

    /// Convert an error status to an [`RdapError`]
    fn handle_error<T>(url: &str, status: u16) -> Result<T> {
        match status {
            404 => Err(RdapError::NotFound {
                url: url.to_string(),
            }),
            _ => {
                warn!(url = %url, status, "upstream returned an error status");
                Err(RdapError::Upstream {
                    status,
                    url: url.to_string(),
                })
            }
        }
    }
}

/// Builder for configuring an [`RdapClient`]
pub struct RdapClientBuilder {
    bootstrap_base_url: String,
    timeout: Option<Duration>,
    user_agent: String,
    outbound_rps: Option<u32>,
}

impl Default for RdapClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RdapClientBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            bootstrap_base_url: rdap_core::IANA_BOOTSTRAP_BASE_URL.to_string(),
            timeout: None,
            user_agent: format!("rdapq/{}", env!("CARGO_PKG_VERSION")),
            outbound_rps: None,
        }
    }

    /// Set the bootstrap base URL (useful for testing)
    #[must_use]
    pub fn bootstrap_base_url(mut self, url: impl Into<String>) -> Self {
        self.bootstrap_base_url = url.into();
        self
    }

    /// Set a request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Limit outbound requests per second; `None` disables throttling
    #[must_use]
    pub const fn outbound_rps(mut self, rps: Option<u32>) -> Self {
        self.outbound_rps = rps;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<RdapClient> {
        url::Url::parse(&self.bootstrap_base_url).map_err(|e| {
            RdapError::Config(format!(
                "invalid bootstrap base URL {:?}: {e}",
                self.bootstrap_base_url
            ))
        })?;

        let mut http = HttpClient::builder().user_agent(&self.user_agent).gzip(true);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http
            .build()
            .map_err(|e| RdapError::Config(format!("failed to build HTTP client: {e}")))?;

        let throttle = self
            .outbound_rps
            .and_then(NonZeroU32::new)
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));

        Ok(RdapClient {
            inner: Arc::new(ClientInner {
                http,
                bootstrap_base_url: self.bootstrap_base_url,
                throttle,
            }),
        })
    }
}
