//! `rdapq classify` - Show how a query is classified.

use anyhow::Result;
use colored::Colorize;
use rdap::{classify, normalize, BootstrapKind, QueryType};
use serde::Serialize;

use super::{require_query, Context};
use crate::cli::args::QueryArgs;
use crate::education::Explain;
use crate::output::print_structured;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Classification<'a> {
    query: &'a str,
    query_type: QueryType,
    normalized_query: String,
    rdap_path: String,
    bootstrap_registry: BootstrapKind,
}

pub async fn execute(ctx: Context, args: QueryArgs) -> Result<()> {
    let query = require_query(&args.query)?;

    if ctx.explain {
        Explain::classify(query).print();
    }

    let query_type = classify(query);
    let normalized_query = normalize(query_type, query);
    let classification = Classification {
        query,
        query_type,
        rdap_path: query_type.resource_path(&normalized_query),
        normalized_query,
        bootstrap_registry: query_type.bootstrap_kind(),
    };

    if print_structured(ctx.output_format, &classification)? {
        return Ok(());
    }

    println!("{} {}", "Query:".bold(), classification.query.cyan().bold());
    println!("  {} {}", "Type:".bold(), classification.query_type.as_str().green());
    println!("  {} {}", "Normalized:".bold(), classification.normalized_query);
    println!("  {} {}", "Path:".bold(), classification.rdap_path);
    println!(
        "  {} {}",
        "Registry:".bold(),
        classification.bootstrap_registry.iana_url().dimmed()
    );

    Ok(())
}
