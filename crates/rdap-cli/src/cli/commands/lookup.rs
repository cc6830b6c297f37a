//! `rdapq lookup` - Fetch registration data for a query.

use anyhow::{anyhow, Result};
use colored::Colorize;
use rdap::{Clock, RdapError};

use super::{require_query, Context, LOCAL_CLIENT};
use crate::cli::args::LookupArgs;
use crate::education::Explain;
use crate::output::{print_structured, RdapSummary};

pub async fn execute(ctx: Context, args: LookupArgs) -> Result<()> {
    let query = require_query(&args.query)?;

    if ctx.explain {
        Explain::lookup(query).print();
    }

    let lookup = ctx.lookup()?;
    let response = match lookup.lookup(query, LOCAL_CLIENT).await {
        Ok(response) => response,
        Err(err) => return Err(describe_failure(err, lookup.clock().as_ref())),
    };

    if print_structured(ctx.output_format, &*response.payload)? {
        return Ok(());
    }

    if args.raw {
        println!("{}", serde_json::to_string_pretty(&*response.payload)?);
    } else {
        RdapSummary::from_payload(&response.payload).print(query);
    }

    if ctx.verbose {
        println!();
        for (name, value) in response.headers(lookup.clock().now()) {
            println!("{}", format!("{name}: {value}").dimmed());
        }
    }

    Ok(())
}

/// Attach a next-step hint to lookup failures a user can act on.
fn describe_failure(err: RdapError, clock: &dyn Clock) -> anyhow::Error {
    if let Some(secs) = err.retry_after(clock.now()) {
        return anyhow!("{err}\nRetry-After: {secs} seconds");
    }
    if err.is_not_found() {
        return anyhow!("{err}\nNo registration data exists for this query; check the spelling.");
    }
    err.into()
}
