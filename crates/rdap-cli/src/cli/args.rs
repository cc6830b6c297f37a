//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Registration data for domains, IP addresses and AS numbers
///
/// Finds the authoritative RDAP server through the IANA bootstrap
/// registries and prints what it knows about the query.
/// Use --explain on any command to learn what it does.
#[derive(Parser, Debug)]
#[command(name = "rdapq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (or set RDAPQ_CONFIG env var)
    #[arg(short, long, env = "RDAPQ_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Explain what this command does (educational mode)
    #[arg(long, global = true)]
    pub explain: bool,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch registration data for a domain, IP address or AS number
    Lookup(LookupArgs),

    /// Show how a query is classified, without any network access
    Classify(QueryArgs),

    /// Show which RDAP server would answer a query
    Resolve(QueryArgs),

    /// Fetch the IANA bootstrap registries and summarize them
    Bootstrap,

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Lookup command
// ============================================================================

#[derive(Args, Debug)]
pub struct LookupArgs {
    /// Domain, IPv4/IPv6 address or AS number (e.g. example.com, 192.0.2.1, AS15169)
    pub query: String,

    /// Print the raw RDAP payload instead of a summary (pretty output only)
    #[arg(long)]
    pub raw: bool,
}

// ============================================================================
// Classify / Resolve commands
// ============================================================================

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Domain, IPv4/IPv6 address or AS number
    pub query: String,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Value to set
        value: String,
    },

    /// Show configuration file path
    Path,
}
