//! Command implementations.

pub mod bootstrap;
pub mod classify;
pub mod config;
pub mod lookup;
pub mod resolve;

use std::path::PathBuf;

use crate::config::Config;
use crate::output::OutputFormat;

/// Client identity used for rate limiting local lookups.
pub const LOCAL_CLIENT: &str = "local";

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration
    pub config: Config,

    /// Where the configuration lives
    pub config_path: PathBuf,

    /// Output format
    pub output_format: OutputFormat,

    /// Whether to show educational explanations
    pub explain: bool,

    /// Verbose output
    pub verbose: bool,
}

impl Context {
    /// Build a lookup pipeline from the configured settings.
    pub fn lookup(&self) -> anyhow::Result<rdap::RdapLookup> {
        Ok(rdap::RdapLookup::new(self.config.lookup.clone())?)
    }
}

/// Reject blank queries the same way the lookup pipeline does.
fn require_query(query: &str) -> anyhow::Result<&str> {
    let query = query.trim();
    if query.is_empty() {
        return Err(rdap::RdapError::Validation("query parameter is required".into()).into());
    }
    Ok(query)
}
