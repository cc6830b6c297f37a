//! `rdapq bootstrap` - Fetch and summarize the IANA bootstrap registries.

use anyhow::Result;
use colored::Colorize;
use rdap::BootstrapKind;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::education::Explain;
use crate::output::print_structured;

#[derive(Debug, Serialize, Tabled)]
struct RegistryRow {
    #[tabled(rename = "Registry")]
    registry: BootstrapKind,
    #[tabled(rename = "Services")]
    services: usize,
    #[tabled(rename = "Servers")]
    servers: usize,
    #[tabled(rename = "Published")]
    publication: String,
}

pub async fn execute(ctx: Context) -> Result<()> {
    if ctx.explain {
        Explain::bootstrap().print();
    }

    let lookup = ctx.lookup()?;
    let registry = lookup.bootstrap();
    let failures = registry.prefetch_all().await;

    let mut rows = Vec::new();
    for kind in registry.cached_kinds() {
        let document = registry.get(kind).await?;
        let mut servers: Vec<&str> = document
            .services
            .iter()
            .filter_map(|service| service.primary_server())
            .collect();
        servers.sort_unstable();
        servers.dedup();

        rows.push(RegistryRow {
            registry: kind,
            services: document.services.len(),
            servers: servers.len(),
            publication: document.publication.clone().unwrap_or_default(),
        });
    }

    if !print_structured(ctx.output_format, &rows)? {
        println!("{}", Table::new(&rows).with(Style::rounded()));
    }

    for (kind, err) in &failures {
        eprintln!("{} {}: {}", "Warning:".yellow().bold(), kind, err);
    }
    if rows.is_empty() {
        anyhow::bail!("no bootstrap registry could be fetched");
    }

    Ok(())
}
