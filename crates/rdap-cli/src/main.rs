//! rdapq - RDAP lookups from the command line
//!
//! Finds the authoritative registry for a domain, IP address or AS number and
//! prints its registration data.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    rdap_cli::run().await
}
