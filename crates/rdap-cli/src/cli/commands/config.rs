//! `rdapq config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::print_structured;

pub async fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(&ctx, &key, &value),
        ConfigCommands::Path => {
            println!("{}", ctx.config_path.display());
            Ok(())
        }
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    if print_structured(ctx.output_format, config)? {
        return Ok(());
    }

    let lookup = &config.lookup;
    println!("{}", "Current Configuration:".bold());
    println!();
    println!(
        "  {} {}",
        "output_format:".bold(),
        config.output_format.unwrap_or_default()
    );
    println!("  {} {}s", "response_ttl_secs:".bold(), lookup.response_ttl_secs);
    println!("  {} {}s", "bootstrap_ttl_secs:".bold(), lookup.bootstrap_ttl_secs);
    println!(
        "  {} {} per {}s",
        "rate_limit:".bold(),
        lookup.rate_limit.limit,
        lookup.rate_limit.window_secs
    );
    let rps = lookup
        .outbound_rps
        .map_or_else(|| "(unlimited)".dimmed().to_string(), |rps| rps.to_string());
    println!("  {} {}", "outbound_rps:".bold(), rps);
    println!("  {} {}", "bootstrap_base_url:".bold(), lookup.bootstrap_base_url);
    println!();
    println!("{}", format!("File: {}", ctx.config_path.display()).dimmed());

    Ok(())
}

fn set_config(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config: Config = ctx.config.clone();
    config.set(key, value)?;
    config.save(&ctx.config_path)?;

    println!("{} {} set to {}.", "Success:".green().bold(), key, value.cyan());
    Ok(())
}
