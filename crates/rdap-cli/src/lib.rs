//! # rdap-cli
//!
//! Command-line interface for the rdap resolution engine.
//!
//! ## Features
//!
//! - **Lookups**: domains, IPv4/IPv6 addresses and AS numbers via IANA bootstrap
//! - **Inspection**: `classify` and `resolve` show how a query would be routed
//! - **Bootstrap status**: warm and inspect the four IANA registries
//! - **Educational mode**: `--explain` describes what a command does
//! - **Multiple output formats**: Pretty, JSON, YAML

pub mod cli;
pub mod config;
pub mod education;
pub mod output;

pub use cli::run;
