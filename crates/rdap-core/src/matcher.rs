//! Address and number range containment.
//!
//! These run inside a scan over every range of a bootstrap document, so a
//! malformed address or range is reported as a non-match rather than an
//! error.

use ipnetwork::{Ipv4Network, Ipv6Network};
use std::net::{Ipv4Addr, Ipv6Addr};

/// Returns true if `ip` falls inside the IPv4 `cidr` block.
///
/// Octets are read as plain integers, so `192.168.01.5` is `192.168.1.5`.
#[must_use]
pub fn ipv4_in_range(ip: &str, cidr: &str) -> bool {
    let Some((base, prefix)) = cidr.trim().split_once('/') else {
        return false;
    };
    let (Some(ip), Some(base), Ok(prefix)) = (dotted_quad(ip), dotted_quad(base), prefix.parse::<u8>())
    else {
        return false;
    };
    Ipv4Network::new(base, prefix).is_ok_and(|network| network.contains(ip))
}

/// Returns true if `ip` falls inside the IPv6 `cidr` block.
#[must_use]
pub fn ipv6_in_range(ip: &str, cidr: &str) -> bool {
    let (Ok(ip), Some(network)) = (ip.trim().parse::<Ipv6Addr>(), parse_cidr::<Ipv6Network>(cidr))
    else {
        return false;
    };
    network.contains(ip)
}

/// Returns true if `asn` is inside `range`, either `"start-end"` (inclusive)
/// or a single number.
#[must_use]
pub fn asn_in_range(asn: u64, range: &str) -> bool {
    if let Some((start, end)) = range.split_once('-') {
        match (start.trim().parse::<u64>(), end.trim().parse::<u64>()) {
            (Ok(start), Ok(end)) => (start..=end).contains(&asn),
            _ => false,
        }
    } else {
        range.trim().parse::<u64>() == Ok(asn)
    }
}

/// Parse `addr/len`. A bare address is not a block here, even though
/// `ipnetwork` would read it as a host route.
fn parse_cidr<N: std::str::FromStr>(cidr: &str) -> Option<N> {
    let cidr = cidr.trim();
    if !cidr.contains('/') {
        return None;
    }
    cidr.parse().ok()
}

/// Four dot-separated decimal octets, leading zeros allowed.
fn dotted_quad(input: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut groups = input.trim().split('.');
    for octet in &mut octets {
        let group = groups.next()?;
        if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *octet = group.parse().ok()?;
    }
    groups.next().is_none().then(|| Ipv4Addr::from(octets))
}
