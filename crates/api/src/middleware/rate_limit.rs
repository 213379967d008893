//! Per-client request rate limiting.
//!
//! Every client address gets its own token bucket: `requests_per_second`
//! replenishment with up to `burst_size` requests at once. Requests over the
//! quota get `429 Too Many Requests` with a `Retry-After` header.

use std::net::SocketAddr;
use std::num::NonZeroU32;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};

use crate::state::AppState;

/// Client key used when the connection address is not available.
const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Steady replenishment rate per client (default: `2`).
    pub requests_per_second: u32,
    /// Requests a client may send at once (default: `4`).
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_second: 2,
            burst_size: 4,
        }
    }
}

type ClientLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited { retry_after_secs: u64 },
}

/// Token buckets for every client seen recently.
pub struct RateLimitState {
    config: RateLimitConfig,
    limiter: ClientLimiter,
}

impl RateLimitState {
    pub fn new(config: RateLimitConfig) -> Self {
        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(per_second).allow_burst(burst);
        Self {
            config,
            limiter: RateLimiter::keyed(quota),
        }
    }

    /// Take one request from `client`'s bucket.
    pub fn check(&self, client: &str) -> RateLimitDecision {
        if !self.config.enabled {
            return RateLimitDecision::Allowed;
        }
        match self.limiter.check_key(&client.to_string()) {
            Ok(()) => RateLimitDecision::Allowed,
            Err(not_until) => {
                let wait = not_until.wait_time_from(DefaultClock::default().now());
                // Round up so clients never retry before the bucket refills.
                let retry_after_secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
                RateLimitDecision::Limited {
                    retry_after_secs: retry_after_secs.max(1),
                }
            }
        }
    }

    /// Forget clients whose buckets have fully refilled.
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }
}

/// Axum middleware applying [`RateLimitState::check`] keyed by client IP.
pub async fn enforce(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| UNKNOWN_CLIENT.to_string(), |info| info.0.ip().to_string());

    match state.rate_limit.check(&client) {
        RateLimitDecision::Allowed => next.run(request).await,
        RateLimitDecision::Limited { retry_after_secs } => {
            tracing::warn!(
                client = %client,
                path = %request.uri().path(),
                retry_after_secs,
                "Rate limit exceeded"
            );
            limited_response(retry_after_secs)
        }
    }
}

fn limited_response(retry_after_secs: u64) -> Response {
    let body = serde_json::json!({
        "error": "rate limit exceeded",
        "code": "RATE_LIMITED",
    });
    let mut response = (StatusCode::TOO_MANY_REQUESTS, axum::Json(body)).into_response();
    if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(requests_per_second: u32, burst_size: u32) -> RateLimitState {
        RateLimitState::new(RateLimitConfig {
            enabled: true,
            requests_per_second,
            burst_size,
        })
    }

    #[test]
    fn burst_is_allowed_then_limited() {
        let limits = state(1, 3);
        for _ in 0..3 {
            assert_eq!(limits.check("10.0.0.1"), RateLimitDecision::Allowed);
        }
        assert!(matches!(
            limits.check("10.0.0.1"),
            RateLimitDecision::Limited { retry_after_secs } if retry_after_secs >= 1
        ));
    }

    #[test]
    fn clients_have_separate_buckets() {
        let limits = state(1, 1);
        assert_eq!(limits.check("10.0.0.1"), RateLimitDecision::Allowed);
        assert_eq!(limits.check("10.0.0.2"), RateLimitDecision::Allowed);
        assert_ne!(limits.check("10.0.0.1"), RateLimitDecision::Allowed);
        assert_eq!(limits.tracked_clients(), 2);
    }

    #[test]
    fn disabled_limiter_allows_everything() {
        let limits = RateLimitState::new(RateLimitConfig {
            enabled: false,
            requests_per_second: 1,
            burst_size: 1,
        });
        for _ in 0..50 {
            assert_eq!(limits.check("10.0.0.1"), RateLimitDecision::Allowed);
        }
    }

    #[test]
    fn zero_quota_is_clamped_to_one() {
        let limits = state(0, 0);
        assert_eq!(limits.check("10.0.0.1"), RateLimitDecision::Allowed);
        assert_ne!(limits.check("10.0.0.1"), RateLimitDecision::Allowed);
    }
}
