use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::{BootstrapKind, QueryType};

/// Result type alias for RDAP operations
pub type Result<T> = std::result::Result<T, RdapError>;

/// Errors that can occur while resolving an RDAP query
#[derive(Error, Debug)]
pub enum RdapError {
    /// The query was missing or empty
    #[error("invalid query: {0}")]
    Validation(String),

    /// The client exhausted its request window
    #[error("rate limit exceeded ({limit} requests per window), resets at {reset_at}")]
    RateLimited {
        /// Requests allowed per window
        limit: u32,
        /// When the current window ends
        reset_at: DateTime<Utc>,
    },

    /// No bootstrap service covers the query
    #[error("no RDAP server found for {query_type} query {query:?}")]
    NoServerFound {
        /// Classified type of the query
        query_type: QueryType,
        /// The normalized query
        query: String,
    },

    /// The authoritative server answered 404
    #[error("resource not found: {url}")]
    NotFound {
        /// URL that was queried
        url: String,
    },

    /// The authoritative server answered with a non-success status
    #[error("upstream RDAP server returned {status} for {url}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// URL that was queried
        url: String,
    },

    /// Bootstrap data could not be fetched and nothing is cached
    #[error("{kind} bootstrap registry unavailable: {reason}")]
    BootstrapUnavailable {
        /// Which registry failed
        kind: BootstrapKind,
        /// Underlying failure
        reason: String,
    },

    /// Network or transport failure
    #[error("transport error: {0}")]
    Transport(String),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl RdapError {
    /// HTTP-equivalent status for this error
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::RateLimited { .. } => 429,
            Self::NoServerFound { .. } | Self::NotFound { .. } => 404,
            Self::Upstream { .. }
            | Self::BootstrapUnavailable { .. }
            | Self::Transport(_)
            | Self::Json(_)
            | Self::Config(_) => 500,
        }
    }

    /// Returns true for either flavour of "not found"
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NoServerFound { .. } | Self::NotFound { .. })
    }

    /// Seconds until a rate-limited caller may retry
    #[must_use]
    pub fn retry_after(&self, now: DateTime<Utc>) -> Option<u64> {
        match self {
            Self::RateLimited { reset_at, .. } => Some(retry_after_secs(*reset_at, now)),
            _ => None,
        }
    }
}

/// Whole seconds from `now` until `reset_at`, rounded up and never less than one.
#[must_use]
pub fn retry_after_secs(reset_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (reset_at - now).num_milliseconds().max(0);
    #[allow(clippy::cast_sign_loss)]
    let secs = (millis as u64).div_ceil(1000);
    secs.max(1)
}
