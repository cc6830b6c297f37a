//! End-to-end lookups against mocked bootstrap registries and RDAP servers.

use chrono::{TimeZone, Utc};
use rdap_client::{
    CacheStatus, Clock, LookupConfig, ManualClock, RateLimitConfig, RdapError, RdapLookup,
};
use rdap_core::{BootstrapKind, QueryType};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CLIENT: &str = "203.0.113.50";

struct Harness {
    server: MockServer,
    lookup: RdapLookup,
    clock: ManualClock,
}

impl Harness {
    async fn new(config: LookupConfig) -> Self {
        let server = MockServer::start().await;
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        let config = config.bootstrap_base_url(format!("{}/bootstrap/", server.uri()));
        let lookup = RdapLookup::builder(config)
            .clock(Arc::new(clock.clone()))
            .build()
            .unwrap();
        Self {
            server,
            lookup,
            clock,
        }
    }

    fn rdap_base(&self) -> String {
        format!("{}/rdap/", self.server.uri())
    }

    async fn mount_bootstrap(&self, kind: BootstrapKind, services: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/bootstrap/{}", kind.file_name())))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "version": "1.0",
                "publication": "2024-06-01T00:00:00Z",
                "services": services,
            })))
            .mount(&self.server)
            .await;
    }
}

#[tokio::test]
async fn ipv4_lookup_resolves_queries_and_annotates() {
    let h = Harness::new(LookupConfig::default()).await;
    h.mount_bootstrap(
        BootstrapKind::Ipv4,
        json!([
            [["198.51.100.0/24"], ["https://rdap.elsewhere.example/"]],
            [["10.0.0.0/8", "192.0.2.0/24"], [h.rdap_base(), "https://backup.example/"]],
        ]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/rdap/ip/192.0.2.1"))
        .and(header("accept", "application/rdap+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objectClassName": "ip network",
            "handle": "NET-192-0-2-0-1",
            "startAddress": "192.0.2.0",
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let first = h.lookup.lookup("192.0.2.1", CLIENT).await.unwrap();
    assert_eq!(first.cache, CacheStatus::Miss);
    assert_eq!(first.payload["_queryType"], "ipv4");
    assert_eq!(first.payload["_query"], "192.0.2.1");
    assert_eq!(first.payload["handle"], "NET-192-0-2-0-1");
    let decision = first.rate_limit.unwrap();
    assert!(decision.allowed);
    assert_eq!(decision.remaining, 29);

    // Served from cache: no second upstream request, no rate-limit charge.
    let second = h.lookup.lookup(" 192.0.2.1 ", CLIENT).await.unwrap();
    assert_eq!(second.cache, CacheStatus::Hit);
    assert!(second.rate_limit.is_none());
    assert!(Arc::ptr_eq(&first.payload, &second.payload));
    assert_eq!(h.lookup.rate_limiter().entry(CLIENT).unwrap().count, 1);
}

#[tokio::test]
async fn differently_cased_queries_share_one_cache_entry() {
    let h = Harness::new(LookupConfig::default()).await;
    h.mount_bootstrap(BootstrapKind::Dns, json!([[["com"], [h.rdap_base()]]]))
        .await;

    Mock::given(method("GET"))
        .and(path("/rdap/domain/example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ldhName": "example.com"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let first = h.lookup.lookup("Example.COM", CLIENT).await.unwrap();
    assert_eq!(first.cache, CacheStatus::Miss);
    assert_eq!(first.payload["_query"], "Example.COM");

    // The hit carries the casing of whoever populated the entry.
    let second = h.lookup.lookup("example.com", CLIENT).await.unwrap();
    assert_eq!(second.cache, CacheStatus::Hit);
    assert_eq!(second.payload["_query"], "Example.COM");
}

#[tokio::test]
async fn asn_not_found_upstream_is_rdap_not_found() {
    let h = Harness::new(LookupConfig::default()).await;
    h.mount_bootstrap(
        BootstrapKind::Asn,
        json!([[["1-1876", "15169"], [h.rdap_base()]]]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/rdap/autnum/15169"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&h.server)
        .await;

    let err = h.lookup.lookup("AS15169", CLIENT).await.unwrap_err();
    match &err {
        RdapError::NotFound { url } => assert!(url.ends_with("/rdap/autnum/15169")),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn unknown_tld_is_no_server_found() {
    let h = Harness::new(LookupConfig::default()).await;
    h.mount_bootstrap(BootstrapKind::Dns, json!([[["com", "net"], [h.rdap_base()]]]))
        .await;

    Mock::given(path_regex("^/rdap/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.server)
        .await;

    let err = h.lookup.lookup("Example.Invalid", CLIENT).await.unwrap_err();
    match err {
        RdapError::NoServerFound { query_type, query } => {
            assert_eq!(query_type, QueryType::Domain);
            assert_eq!(query, "example.invalid");
        }
        other => panic!("expected NoServerFound, got {other:?}"),
    }
}

#[tokio::test]
async fn upstream_errors_are_not_cached() {
    let h = Harness::new(LookupConfig::default()).await;
    h.mount_bootstrap(BootstrapKind::Dns, json!([[["com"], [h.rdap_base()]]]))
        .await;

    Mock::given(method("GET"))
        .and(path("/rdap/domain/example.com"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&h.server)
        .await;

    for _ in 0..2 {
        let err = h.lookup.lookup("example.com", CLIENT).await.unwrap_err();
        assert!(matches!(err, RdapError::Upstream { status: 503, .. }));
        assert_eq!(err.status_code(), 500);
    }
    assert!(h.lookup.cache().is_empty());
}

#[tokio::test]
async fn rate_limit_applies_to_cache_misses_only() {
    let config = LookupConfig::default().rate_limit(RateLimitConfig::new(2, Duration::from_secs(60)));
    let h = Harness::new(config).await;
    h.mount_bootstrap(BootstrapKind::Dns, json!([[["com"], [h.rdap_base()]]]))
        .await;

    Mock::given(method("GET"))
        .and(path_regex("^/rdap/domain/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"objectClassName": "domain"})))
        .expect(3)
        .mount(&h.server)
        .await;

    let a = h.lookup.lookup("a.com", CLIENT).await.unwrap();
    let b = h.lookup.lookup("b.com", CLIENT).await.unwrap();
    assert_eq!(a.rate_limit.unwrap().remaining, 1);
    assert_eq!(b.rate_limit.unwrap().remaining, 0);

    let err = h.lookup.lookup("c.com", CLIENT).await.unwrap_err();
    let RdapError::RateLimited { limit, reset_at } = err else {
        panic!("expected RateLimited, got {err:?}");
    };
    assert_eq!(limit, 2);
    assert_eq!(reset_at, h.clock.now() + chrono::TimeDelta::seconds(60));

    // A cached answer is still served to the throttled client.
    let cached = h.lookup.lookup("a.com", CLIENT).await.unwrap();
    assert_eq!(cached.cache, CacheStatus::Hit);

    // Other clients have their own window.
    let other = h.lookup.lookup("c.com", "198.51.100.1").await.unwrap();
    assert_eq!(other.cache, CacheStatus::Miss);
}

#[tokio::test]
async fn cached_responses_expire() {
    let config = LookupConfig::default().response_ttl(Duration::from_secs(60));
    let h = Harness::new(config).await;
    h.mount_bootstrap(BootstrapKind::Ipv6, json!([[["2001:db8::/32"], [h.rdap_base()]]]))
        .await;

    Mock::given(method("GET"))
        .and(path("/rdap/ip/2001:db8::1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"objectClassName": "ip network"})))
        .expect(2)
        .mount(&h.server)
        .await;

    let first = h.lookup.lookup("2001:db8::1", CLIENT).await.unwrap();
    assert_eq!(first.payload["_queryType"], "ipv6");

    h.clock.advance(Duration::from_secs(30));
    assert_eq!(
        h.lookup.lookup("2001:db8::1", CLIENT).await.unwrap().cache,
        CacheStatus::Hit
    );

    h.clock.advance(Duration::from_secs(31));
    assert_eq!(
        h.lookup.lookup("2001:db8::1", CLIENT).await.unwrap().cache,
        CacheStatus::Miss
    );
}

#[tokio::test]
async fn bootstrap_is_fetched_once_per_ttl() {
    let h = Harness::new(LookupConfig::default()).await;
    Mock::given(method("GET"))
        .and(path("/bootstrap/dns.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "services": [[["org"], [h.rdap_base()]]]
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    for query in ["one.org", "two.org", "three.org"] {
        let target = h.lookup.resolve(query).await.unwrap();
        assert_eq!(target.rdap_server.as_deref(), Some(h.rdap_base().as_str()));
        assert_eq!(target.rdap_path, format!("domain/{query}"));
    }
}

#[tokio::test]
async fn bootstrap_is_refetched_after_configured_ttl() {
    let h = Harness::new(LookupConfig::default().bootstrap_ttl(Duration::from_secs(60))).await;
    Mock::given(method("GET"))
        .and(path("/bootstrap/dns.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "services": [[["net"], [h.rdap_base()]]]
        })))
        .expect(2)
        .mount(&h.server)
        .await;

    h.lookup.resolve("one.net").await.unwrap();
    h.clock.advance(Duration::from_secs(59));
    h.lookup.resolve("two.net").await.unwrap();
    h.clock.advance(Duration::from_secs(2));
    let target = h.lookup.resolve("three.net").await.unwrap();
    assert_eq!(target.rdap_server.as_deref(), Some(h.rdap_base().as_str()));
}

#[tokio::test]
async fn bootstrap_failure_without_cache_is_unavailable() {
    let h = Harness::new(LookupConfig::default()).await;
    Mock::given(method("GET"))
        .and(path("/bootstrap/asn.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    let err = h.lookup.lookup("AS64512", CLIENT).await.unwrap_err();
    assert!(matches!(
        err,
        RdapError::BootstrapUnavailable {
            kind: BootstrapKind::Asn,
            ..
        }
    ));
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn stale_bootstrap_survives_registry_outage() {
    let h = Harness::new(LookupConfig::default()).await;
    Mock::given(method("GET"))
        .and(path("/bootstrap/asn.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "services": [[["64512-65534"], [h.rdap_base()]]]
        })))
        .up_to_n_times(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/bootstrap/asn.json"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&h.server)
        .await;

    assert!(h.lookup.resolve("AS64512").await.unwrap().rdap_server.is_some());

    h.clock.advance(Duration::from_secs(2 * 24 * 60 * 60));
    let target = h.lookup.resolve("AS65000").await.unwrap();
    assert_eq!(target.rdap_server.as_deref(), Some(h.rdap_base().as_str()));
    assert_eq!(target.rdap_path, "autnum/65000");
}
