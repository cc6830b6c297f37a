//! Fixed-window per-client request limiting.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rdap_core::retry_after_secs;
use reqwest::header::HeaderMap;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::clock::{expiry, Clock};

/// Bucket shared by every client that cannot be identified
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Request count for one client's current window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateEntry {
    /// Requests admitted in this window
    pub count: u32,
    /// When the window ends and a fresh one begins
    pub reset_at: DateTime<Utc>,
}

/// Outcome of a rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitDecision {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Requests allowed per window
    pub limit: u32,
    /// Requests left in the current window
    pub remaining: u32,
    /// When the current window ends
    pub reset_at: DateTime<Utc>,
}

impl RateLimitDecision {
    /// Whole seconds until the window resets, never less than one
    #[must_use]
    pub fn retry_after(&self, now: DateTime<Utc>) -> u64 {
        retry_after_secs(self.reset_at, now)
    }

    /// Standard rate-limit response headers, plus `Retry-After` on denial
    #[must_use]
    pub fn headers(&self, now: DateTime<Utc>) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("X-RateLimit-Limit", self.limit.to_string()),
            ("X-RateLimit-Remaining", self.remaining.to_string()),
            ("X-RateLimit-Reset", self.reset_at.timestamp().to_string()),
        ];
        if !self.allowed {
            headers.push(("Retry-After", self.retry_after(now).to_string()));
        }
        headers
    }
}

/// Fixed-window limiter keyed by client identifier
#[derive(Debug)]
pub struct RateLimiter {
    entries: DashMap<String, RateEntry>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Create an empty limiter reading time from `clock`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Count a request from `client_id` against `limit` per `window`.
    ///
    /// A new window starts on the first request, or on the first request at
    /// or after the previous `reset_at`. Denied requests do not increment the
    /// count.
    pub fn check(&self, client_id: &str, limit: u32, window: Duration) -> RateLimitDecision {
        let now = self.clock.now();

        if limit == 0 {
            return RateLimitDecision {
                allowed: false,
                limit,
                remaining: 0,
                reset_at: expiry(now, window),
            };
        }

        let mut entry = self
            .entries
            .entry(client_id.to_string())
            .or_insert(RateEntry {
                count: 0,
                reset_at: now,
            });

        let allowed = if now >= entry.reset_at {
            *entry = RateEntry {
                count: 1,
                reset_at: expiry(now, window),
            };
            true
        } else if entry.count >= limit {
            false
        } else {
            entry.count += 1;
            true
        };

        let decision = RateLimitDecision {
            allowed,
            limit,
            remaining: limit.saturating_sub(entry.count),
            reset_at: entry.reset_at,
        };
        drop(entry);

        if !allowed {
            debug!(client = client_id, reset_at = %decision.reset_at, "rate limit exceeded");
        }
        decision
    }

    /// Current entry for a client, if any
    #[must_use]
    pub fn entry(&self, client_id: &str) -> Option<RateEntry> {
        self.entries.get(client_id).map(|entry| *entry)
    }

    /// Number of tracked clients
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no client is tracked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Derive a client identifier from proxy headers.
///
/// Uses the first `X-Forwarded-For` hop, then `X-Real-IP`, then the shared
/// [`UNKNOWN_CLIENT`] bucket.
#[must_use]
pub fn client_id(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    header("x-forwarded-for")
        .and_then(|chain| chain.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .or_else(|| header("x-real-ip"))
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use reqwest::header::HeaderValue;
    use std::sync::atomic::{AtomicU32, Ordering};

    const MINUTE: Duration = Duration::from_secs(60);

    fn limiter() -> (RateLimiter, ManualClock) {
        let clock = ManualClock::default();
        (RateLimiter::new(Arc::new(clock.clone())), clock)
    }

    #[test]
    fn test_third_call_denied() {
        let (limiter, _clock) = limiter();
        let results: Vec<_> = (0..3).map(|_| limiter.check("1.2.3.4", 2, MINUTE)).collect();

        assert_eq!(
            results.iter().map(|d| d.allowed).collect::<Vec<_>>(),
            vec![true, true, false]
        );
        assert_eq!(results[0].remaining, 1);
        assert_eq!(results[1].remaining, 0);
        assert_eq!(results[2].remaining, 0);
        // Denial leaves the count at the ceiling.
        assert_eq!(limiter.entry("1.2.3.4").unwrap().count, 2);
    }

    #[test]
    fn test_window_resets_exactly_at_reset_at() {
        let (limiter, clock) = limiter();
        let first = limiter.check("c", 1, MINUTE);
        assert!(!limiter.check("c", 1, MINUTE).allowed);

        clock.advance(Duration::from_millis(59_999));
        assert!(!limiter.check("c", 1, MINUTE).allowed);

        clock.advance(Duration::from_millis(1));
        let fresh = limiter.check("c", 1, MINUTE);
        assert!(fresh.allowed);
        assert_eq!(fresh.remaining, 0);
        assert_eq!(fresh.reset_at, first.reset_at + chrono::TimeDelta::seconds(60));
    }

    #[test]
    fn test_concurrent_checks_never_exceed_limit() {
        let (limiter, _clock) = limiter();
        let allowed = AtomicU32::new(0);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        if limiter.check("c", 25, MINUTE).allowed {
                            allowed.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                });
            }
        });

        assert_eq!(allowed.load(Ordering::SeqCst), 25);
        assert_eq!(limiter.entry("c").unwrap().count, 25);
    }

    #[test]
    fn test_clients_are_independent() {
        let (limiter, _clock) = limiter();
        assert!(limiter.check("a", 1, MINUTE).allowed);
        assert!(limiter.check("b", 1, MINUTE).allowed);
        assert!(!limiter.check("a", 1, MINUTE).allowed);
        assert_eq!(limiter.len(), 2);
    }

    #[test]
    fn test_zero_limit_denies_without_tracking() {
        let (limiter, _clock) = limiter();
        let decision = limiter.check("a", 0, MINUTE);
        assert!(!decision.allowed);
        assert_eq!(decision.remaining, 0);
        assert!(limiter.is_empty());
    }

    #[test]
    fn test_headers_on_denial() {
        let (limiter, clock) = limiter();
        limiter.check("a", 1, MINUTE);
        clock.advance(Duration::from_millis(30_500));
        let denied = limiter.check("a", 1, MINUTE);

        let headers = denied.headers(clock.now());
        assert!(headers.contains(&("X-RateLimit-Limit", "1".to_string())));
        assert!(headers.contains(&("X-RateLimit-Remaining", "0".to_string())));
        assert!(headers.contains(&("X-RateLimit-Reset", "60".to_string())));
        assert!(headers.contains(&("Retry-After", "30".to_string())));

        let allowed = limiter.check("b", 1, MINUTE);
        assert!(allowed.headers(clock.now()).iter().all(|(name, _)| *name != "Retry-After"));
    }

    #[test]
    fn test_client_id_precedence() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_id(&headers), "unknown");

        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.7"));
        assert_eq!(client_id(&headers), "198.51.100.7");

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static(" 203.0.113.9 , 10.0.0.1"),
        );
        assert_eq!(client_id(&headers), "203.0.113.9");

        headers.insert("x-forwarded-for", HeaderValue::from_static(""));
        assert_eq!(client_id(&headers), "198.51.100.7");
    }
}
