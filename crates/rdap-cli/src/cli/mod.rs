//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let config_path = Config::resolve_path(cli.config.as_deref())?;
    let config = Config::load(&config_path)?;
    debug!(path = %config_path.display(), "configuration loaded");

    // Flag beats config file beats default
    let output_format = cli.output.or(config.output_format).unwrap_or_default();

    let ctx = commands::Context {
        config,
        config_path,
        output_format,
        explain: cli.explain,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Lookup(args) => commands::lookup::execute(ctx, args).await,
        Commands::Classify(args) => commands::classify::execute(ctx, args).await,
        Commands::Resolve(args) => commands::resolve::execute(ctx, args).await,
        Commands::Bootstrap => commands::bootstrap::execute(ctx).await,
        Commands::Config(args) => commands::config::execute(ctx, args).await,
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "rdap_client=debug,rdap_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}
