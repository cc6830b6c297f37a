use serde::{Deserialize, Serialize};
use std::fmt;

use super::BootstrapKind;

/// Kind of resource a free-form query refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    /// A domain name
    Domain,
    /// An IPv4 address
    Ipv4,
    /// An IPv6 address
    Ipv6,
    /// An autonomous system number
    Asn,
}

impl QueryType {
    /// Lower-case name, as attached to payloads in `_queryType`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::Asn => "asn",
        }
    }

    /// The bootstrap registry that covers this query type
    #[must_use]
    pub const fn bootstrap_kind(self) -> BootstrapKind {
        match self {
            Self::Domain => BootstrapKind::Dns,
            Self::Ipv4 => BootstrapKind::Ipv4,
            Self::Ipv6 => BootstrapKind::Ipv6,
            Self::Asn => BootstrapKind::Asn,
        }
    }

    /// RDAP path segment for this resource class
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Ipv4 | Self::Ipv6 => "ip",
            Self::Asn => "autnum",
        }
    }

    /// Build the RDAP resource path (`domain/<name>`, `ip/<addr>`, `autnum/<n>`)
    #[must_use]
    pub fn resource_path(self, normalized_query: &str) -> String {
        format!("{}/{}", self.path_segment(), normalized_query)
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
