//! Bootstrap discovery, caching and rate-limited RDAP lookups.
//!
//! The entry point is [`RdapLookup`], which sequences a lookup as
//! cache check, rate-limit check, classification, bootstrap resolution,
//! the RDAP query itself and finally a cache store.
//!
//! The shared stores ([`TtlCache`], [`RateLimiter`], [`BootstrapRegistry`])
//! are plain objects that take an injectable [`Clock`], so tests can build
//! isolated instances with controlled time.

#![doc(html_root_url = "https://docs.rs/rdap-client/0.3.0")]

pub mod bootstrap;
pub mod cache;
mod client;
pub mod clock;
mod config;
mod lookup;
pub mod rate_limit;

pub use bootstrap::{BootstrapRegistry, BootstrapSource, DEFAULT_BOOTSTRAP_TTL};
pub use cache::{CacheEntry, TtlCache};
pub use client::{RdapClient, RdapClientBuilder, RDAP_CONTENT_TYPE};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::*;
pub use lookup::{CacheStatus, LookupResponse, RdapLookup, RdapLookupBuilder};
pub use rate_limit::{client_id, RateEntry, RateLimitDecision, RateLimiter};
pub use rdap_core::{RdapError, Result};
