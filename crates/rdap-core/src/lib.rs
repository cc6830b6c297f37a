//! Core types and pure algorithms for RDAP resolution.
//!
//! This crate provides the foundational pieces used across the rdap workspace:
//!
//! - **Types**: bootstrap documents, query types and resolved targets
//! - **Classification**: labelling a free-form query as domain, IP or ASN
//! - **Matching**: IPv4/IPv6 CIDR and ASN range containment
//! - **Resolution**: picking the authoritative server from a bootstrap document
//! - **Errors**: the shared [`RdapError`] taxonomy
//!
//! Nothing in here performs I/O.
//!
//! # Example
//!
//! ```rust,ignore
//! use rdap_core::{classify, BootstrapDocument, QueryType};
//!
//! let doc: BootstrapDocument = serde_json::from_str(IPV4_JSON)?;
//! assert_eq!(classify("192.0.2.1"), QueryType::Ipv4);
//! let server = rdap_core::resolve_server(QueryType::Ipv4, "192.0.2.1", &doc);
//! ```

#![doc(html_root_url = "https://docs.rs/rdap-core/0.3.0")]

pub mod classify;
mod error;
pub mod matcher;
pub mod resolve;
pub mod types;

pub use classify::{classify, normalize};
pub use error::{retry_after_secs, RdapError, Result};
pub use resolve::{resolve_server, resolve_target};
pub use types::*;
