//! RDAP resolution engine.
//!
//! Given a domain name, IPv4/IPv6 address or autonomous system number, this
//! crate works out what kind of resource it is, finds the authoritative
//! RDAP server through the IANA bootstrap registries, and fetches the
//! registration data.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rdap::{LookupConfig, RdapLookup};
//!
//! #[tokio::main]
//! async fn main() -> rdap::Result<()> {
//!     let lookup = RdapLookup::new(LookupConfig::default())?;
//!
//!     let response = lookup.lookup("AS15169", "127.0.0.1").await?;
//!     println!("{}", response.payload["name"]);
//!     println!("cache: {}", response.cache.as_str());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/rdap/0.3.0")]

// Re-export core types
pub use rdap_core::*;

// Re-export the lookup pipeline and its stores
pub use rdap_client::{
    client_id, BootstrapRegistry, BootstrapSource, CacheEntry, CacheStatus, Clock, LookupConfig,
    LookupResponse, ManualClock, RateLimitConfig, RateLimitDecision, RateLimiter, RdapClient,
    RdapClientBuilder, RdapLookup, RdapLookupBuilder, SystemClock, TtlCache,
};

// Re-export runtime for convenience
pub use serde_json;
pub use tokio;
