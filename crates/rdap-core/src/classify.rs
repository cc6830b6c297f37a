//! Query classification and normalization.
//!
//! Classification is syntactic only. Anything containing a colon is treated
//! as IPv6, and an IPv4-looking string with octets above 255 still classifies
//! as IPv4; such inputs simply fail to match any bootstrap range later on.

use crate::types::QueryType;

/// Label a free-form query. Rules are applied in order; first match wins:
///
/// 1. `^(AS)?\d+$`, case-insensitive: [`QueryType::Asn`]
/// 2. contains `:`: [`QueryType::Ipv6`]
/// 3. four dot-separated groups of 1-3 digits: [`QueryType::Ipv4`]
/// 4. anything else: [`QueryType::Domain`]
#[must_use]
pub fn classify(input: &str) -> QueryType {
    if asn_digits(input).is_some() {
        QueryType::Asn
    } else if input.contains(':') {
        QueryType::Ipv6
    } else if looks_like_ipv4(input) {
        QueryType::Ipv4
    } else {
        QueryType::Domain
    }
}

/// Canonical form of a query for the given type.
///
/// ASNs lose their `AS` prefix, domains are lower-cased without a trailing
/// root dot, and addresses pass through untouched.
#[must_use]
pub fn normalize(query_type: QueryType, input: &str) -> String {
    match query_type {
        QueryType::Asn => asn_digits(input).unwrap_or(input).to_string(),
        QueryType::Domain => input.strip_suffix('.').unwrap_or(input).to_lowercase(),
        QueryType::Ipv4 | QueryType::Ipv6 => input.to_string(),
    }
}

/// Parse an ASN with an optional, case-insensitive `AS` prefix.
#[must_use]
pub fn parse_asn(input: &str) -> Option<u64> {
    asn_digits(input.trim())?.parse().ok()
}

/// The digit run of `(AS)?\d+`, or `None` if the input has another shape.
fn asn_digits(input: &str) -> Option<&str> {
    let digits = match input.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("as") => &input[2..],
        _ => input,
    };
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
}

fn looks_like_ipv4(input: &str) -> bool {
    let mut groups = 0;
    for group in input.split('.') {
        groups += 1;
        if groups > 4 || group.is_empty() || group.len() > 3 {
            return false;
        }
        if !group.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }
    groups == 4
}
