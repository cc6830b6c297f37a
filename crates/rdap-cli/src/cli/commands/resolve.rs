//! `rdapq resolve` - Show which server would answer a query.

use anyhow::Result;
use colored::Colorize;

use super::{require_query, Context};
use crate::cli::args::QueryArgs;
use crate::education::Explain;
use crate::output::print_structured;

pub async fn execute(ctx: Context, args: QueryArgs) -> Result<()> {
    let query = require_query(&args.query)?;

    if ctx.explain {
        Explain::resolve(query).print();
    }

    let target = ctx.lookup()?.resolve(query).await?;

    if print_structured(ctx.output_format, &target)? {
        return Ok(());
    }

    println!("{} {}", "Query:".bold(), query.cyan().bold());
    println!("  {} {}", "Type:".bold(), target.query_type.as_str().green());
    match target.url() {
        Some(url) => {
            let server = target.rdap_server.as_deref().unwrap_or_default();
            println!("  {} {}", "Server:".bold(), server);
            println!("  {} {}", "URL:".bold(), url.underline());
        }
        None => {
            println!("  {} {}", "Server:".bold(), "none found".red());
            println!(
                "{}",
                format!("No {} bootstrap service covers this query.", target.query_type.bootstrap_kind())
                    .dimmed()
            );
        }
    }

    Ok(())
}
