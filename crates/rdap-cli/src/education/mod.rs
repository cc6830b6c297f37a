//! Educational features: explanations of what each command does.

use colored::Colorize;
use rdap::{classify, normalize, BootstrapKind, QueryType};

/// Command explanation builder.
pub struct Explain {
    description: String,
    request: Option<String>,
    caching: Option<String>,
    what_happens: Vec<String>,
    learn_more: Option<String>,
}

impl Explain {
    fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            request: None,
            caching: None,
            what_happens: Vec::new(),
            learn_more: None,
        }
    }

    fn request(mut self, request: &str) -> Self {
        self.request = Some(request.to_string());
        self
    }

    fn caching(mut self, caching: &str) -> Self {
        self.caching = Some(caching.to_string());
        self
    }

    fn step(mut self, step: &str) -> Self {
        self.what_happens.push(step.to_string());
        self
    }

    fn rfc(mut self, number: u16) -> Self {
        self.learn_more = Some(format!("https://www.rfc-editor.org/rfc/rfc{number}"));
        self
    }

    /// Print the explanation to stdout.
    pub fn print(&self) {
        println!();
        println!("{}", "=== What This Does ===".bold().cyan());
        println!("{}", self.description);
        println!();

        if !self.what_happens.is_empty() {
            println!("{}", "How it works:".bold());
            for (i, step) in self.what_happens.iter().enumerate() {
                println!("  {}. {}", i + 1, step);
            }
            println!();
        }

        if let Some(request) = &self.request {
            println!("{} {}", "Request:".bold(), request.dimmed());
        }

        if let Some(caching) = &self.caching {
            println!("{} {}", "Caching:".bold(), caching);
        }

        if let Some(url) = &self.learn_more {
            println!();
            println!("{} {}", "Learn more:".bold(), url.cyan().underline());
        }

        println!();
        println!("{}", "=== Results ===".bold().cyan());
        println!();
    }

    // ========================================================================
    // Factory methods for each command
    // ========================================================================

    pub fn lookup(query: &str) -> Self {
        let query_type = classify(query.trim());
        let normalized = normalize(query_type, query.trim());

        Self::new(&format!(
            "Fetches the registration record for {} from its authoritative RDAP server.",
            query.trim()
        ))
        .step(&classification_step(query_type))
        .step(&format!(
            "Loads the IANA {} bootstrap registry (cached for a day)",
            query_type.bootstrap_kind()
        ))
        .step("Picks the first service whose keys cover the query")
        .step("Sends a GET to that server and tags the JSON with _queryType and _query")
        .request(&format!("GET <server>{}", query_type.resource_path(&normalized)))
        .caching("Answers are cached for an hour; cache hits skip the rate limit")
        .rfc(9082)
    }

    pub fn classify(query: &str) -> Self {
        Self::new("Works out what kind of resource a query names, without touching the network.")
            .step("AS followed by digits, or bare digits: an AS number")
            .step("Anything with a colon: an IPv6 address")
            .step("Four dot-separated groups of 1-3 digits: an IPv4 address")
            .step("Everything else: a domain name")
            .step(&classification_step(classify(query.trim())))
            .rfc(9224)
    }

    pub fn resolve(query: &str) -> Self {
        let kind = classify(query.trim()).bootstrap_kind();

        Self::new("Finds the RDAP server responsible for a query, without querying it.")
            .step(&format!("Fetches {}", kind.iana_url()))
            .step(match kind {
                BootstrapKind::Dns => "Matches the rightmost label (the TLD) against each service",
                BootstrapKind::Ipv4 | BootstrapKind::Ipv6 => {
                    "Matches the address against each service's CIDR prefixes"
                }
                BootstrapKind::Asn => "Matches the number against each service's ASN ranges",
            })
            .step("The first matching service wins; its first URL is the server")
            .rfc(9224)
    }

    pub fn bootstrap() -> Self {
        Self::new("Downloads all four IANA RDAP bootstrap registries.")
            .step("dns.json maps top-level domains to servers")
            .step("ipv4.json and ipv6.json map address prefixes to servers")
            .step("asn.json maps AS number ranges to servers")
            .caching("Each registry stays fresh for a day; a stale copy is used if IANA is unreachable")
            .rfc(9224)
    }
}

fn classification_step(query_type: QueryType) -> String {
    let kind = match query_type {
        QueryType::Domain => "a domain name",
        QueryType::Ipv4 => "an IPv4 address",
        QueryType::Ipv6 => "an IPv6 address",
        QueryType::Asn => "an AS number",
    };
    format!("Classifies the query as {kind}")
}
