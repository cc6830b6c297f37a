use serde::{Deserialize, Serialize};

use super::QueryType;

/// Where and how a single query should be sent.
///
/// Built once per request and dropped after the RDAP query completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTarget {
    /// Classified query type
    pub query_type: QueryType,

    /// Query after normalization (e.g. `AS` prefix stripped)
    pub normalized_query: String,

    /// Authoritative server base URL, if any bootstrap service matched
    pub rdap_server: Option<String>,

    /// Resource path relative to the server
    pub rdap_path: String,
}

impl ResolvedTarget {
    /// Full request URL, if a server was found.
    ///
    /// Bootstrap servers normally end in `/`; one is inserted when missing.
    #[must_use]
    pub fn url(&self) -> Option<String> {
        self.rdap_server
            .as_deref()
            .map(|server| join_server_path(server, &self.rdap_path))
    }
}

/// Concatenate a server base URL and a resource path.
#[must_use]
pub fn join_server_path(server: &str, path: &str) -> String {
    if server.ends_with('/') || path.starts_with('/') {
        format!("{server}{path}")
    } else {
        format!("{server}/{path}")
    }
}
