use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URL of the IANA RDAP bootstrap registries
pub const IANA_BOOTSTRAP_BASE_URL: &str = "https://data.iana.org/rdap/";

/// One of the four IANA bootstrap registries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BootstrapKind {
    /// Top-level domains (`dns.json`)
    Dns,
    /// IPv4 CIDR blocks (`ipv4.json`)
    Ipv4,
    /// IPv6 CIDR blocks (`ipv6.json`)
    Ipv6,
    /// Autonomous system number ranges (`asn.json`)
    Asn,
}

impl BootstrapKind {
    /// Every registry, in fetch order
    pub const ALL: [Self; 4] = [Self::Dns, Self::Ipv4, Self::Ipv6, Self::Asn];

    /// Lower-case registry name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dns => "dns",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::Asn => "asn",
        }
    }

    /// Registry file name under the bootstrap base URL
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Dns => "dns.json",
            Self::Ipv4 => "ipv4.json",
            Self::Ipv6 => "ipv6.json",
            Self::Asn => "asn.json",
        }
    }

    /// The fixed IANA URL for this registry
    #[must_use]
    pub const fn iana_url(self) -> &'static str {
        match self {
            Self::Dns => "https://data.iana.org/rdap/dns.json",
            Self::Ipv4 => "https://data.iana.org/rdap/ipv4.json",
            Self::Ipv6 => "https://data.iana.org/rdap/ipv6.json",
            Self::Asn => "https://data.iana.org/rdap/asn.json",
        }
    }
}

impl fmt::Display for BootstrapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An IANA bootstrap registry document.
///
/// Immutable once fetched; a refresh replaces the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapDocument {
    /// Format version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Publication timestamp as published by IANA
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication: Option<String>,

    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Service entries, in document order
    #[serde(default)]
    pub services: Vec<BootstrapService>,
}

impl BootstrapDocument {
    /// Build a document from `(keys, servers)` pairs
    #[must_use]
    pub fn from_services<I, K, S>(services: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: IntoIterator,
        K::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            services: services
                .into_iter()
                .map(|(keys, servers)| BootstrapService {
                    keys: keys.into_iter().map(Into::into).collect(),
                    servers: servers.into_iter().map(Into::into).collect(),
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Returns true if the document lists no services
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// A single service entry: the resources it covers and where to ask.
///
/// On the wire this is a two-element array `[[keys...], [servers...]]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<String>>", into = "(Vec<String>, Vec<String>)")]
pub struct BootstrapService {
    /// TLDs, CIDR ranges or ASN ranges covered by this service
    pub keys: Vec<String>,

    /// RDAP base URLs, in preference order
    pub servers: Vec<String>,
}

impl BootstrapService {
    /// The preferred server, if the service lists any
    #[must_use]
    pub fn primary_server(&self) -> Option<&str> {
        self.servers.first().map(String::as_str)
    }
}

impl TryFrom<Vec<Vec<String>>> for BootstrapService {
    type Error = String;

    fn try_from(parts: Vec<Vec<String>>) -> Result<Self, Self::Error> {
        let mut parts = parts.into_iter();
        match (parts.next(), parts.next()) {
            (Some(keys), Some(servers)) => Ok(Self { keys, servers }),
            _ => Err("bootstrap service must contain a key list and a server list".to_string()),
        }
    }
}

impl From<BootstrapService> for (Vec<String>, Vec<String>) {
    fn from(service: BootstrapService) -> Self {
        (service.keys, service.servers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASN_SAMPLE: &str = r#"{
        "description": "RDAP bootstrap file for Autonomous System Number allocations",
        "publication": "2024-05-01T18:00:01Z",
        "services": [
            [["36864-37887", "327680-328703"], ["https://rdap.afrinic.net/rdap/", "http://rdap.afrinic.net/rdap/"]],
            [["1-1876", "15169"], ["https://rdap.arin.net/registry/"]]
        ],
        "version": "1.0"
    }"#;

    #[test]
    fn test_parse_iana_document() {
        let doc: BootstrapDocument = serde_json::from_str(ASN_SAMPLE).unwrap();
        assert_eq!(doc.version.as_deref(), Some("1.0"));
        assert_eq!(doc.publication.as_deref(), Some("2024-05-01T18:00:01Z"));
        assert_eq!(doc.services.len(), 2);
        assert_eq!(doc.services[0].keys, vec!["36864-37887", "327680-328703"]);
        assert_eq!(
            doc.services[0].primary_server(),
            Some("https://rdap.afrinic.net/rdap/")
        );
        assert_eq!(doc.services[1].servers.len(), 1);
    }

    #[test]
    fn test_reject_short_service_entry() {
        let bad = r#"{"services": [[["com"]]]}"#;
        assert!(serde_json::from_str::<BootstrapDocument>(bad).is_err());
    }

    #[test]
    fn test_service_serializes_as_pair() {
        let doc = BootstrapDocument::from_services([(["com"], ["https://rdap.example/"])]);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json["services"],
            serde_json::json!([[["com"], ["https://rdap.example/"]]])
        );
    }

    #[test]
    fn test_iana_urls() {
        for kind in BootstrapKind::ALL {
            assert_eq!(
                kind.iana_url(),
                format!("{IANA_BOOTSTRAP_BASE_URL}{}", kind.file_name())
            );
        }
    }
}
