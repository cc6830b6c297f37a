//! Authoritative server selection from bootstrap documents.
//!
//! Selection is first-match-wins in document order. There is no
//! longest-prefix preference between overlapping IP ranges, and only the
//! first server of the matching service is ever used.

use crate::classify::parse_asn;
use crate::matcher::{asn_in_range, ipv4_in_range, ipv6_in_range};
use crate::types::{BootstrapDocument, BootstrapService, QueryType, ResolvedTarget};

/// Pick the authoritative RDAP server for a normalized query.
///
/// `bootstrap` must be the document for `query_type`'s registry.
#[must_use]
pub fn resolve_server(
    query_type: QueryType,
    normalized_query: &str,
    bootstrap: &BootstrapDocument,
) -> Option<String> {
    let service = match query_type {
        QueryType::Domain => {
            let tld = normalized_query
                .trim_end_matches('.')
                .rsplit('.')
                .next()?
                .to_lowercase();
            first_service(bootstrap, |key| key.eq_ignore_ascii_case(&tld))
        }
        QueryType::Ipv4 => first_service(bootstrap, |range| ipv4_in_range(normalized_query, range)),
        QueryType::Ipv6 => first_service(bootstrap, |range| ipv6_in_range(normalized_query, range)),
        QueryType::Asn => {
            let asn = parse_asn(normalized_query)?;
            first_service(bootstrap, |range| asn_in_range(asn, range))
        }
    }?;

    service.primary_server().map(str::to_string)
}

/// Resolve a query into a full [`ResolvedTarget`].
#[must_use]
pub fn resolve_target(
    query_type: QueryType,
    normalized_query: &str,
    bootstrap: &BootstrapDocument,
) -> ResolvedTarget {
    ResolvedTarget {
        query_type,
        normalized_query: normalized_query.to_string(),
        rdap_server: resolve_server(query_type, normalized_query, bootstrap),
        rdap_path: query_type.resource_path(normalized_query),
    }
}

fn first_service<'a>(
    bootstrap: &'a BootstrapDocument,
    mut matches: impl FnMut(&str) -> bool,
) -> Option<&'a BootstrapService> {
    bootstrap
        .services
        .iter()
        .find(|service| service.keys.iter().any(|key| matches(key)))
}
