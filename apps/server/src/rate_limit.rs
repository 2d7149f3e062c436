use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::ApiResponse;

// ── Tiers ──

/// Rate limit tier, one per router group. Limits are per client IP over a
/// sliding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Public salon pages and availability reads.
    Public,
    /// Booking creation, the strictest tier.
    Booking,
    /// Professional agenda and revenue views.
    Agenda,
    /// Owner/admin management endpoints.
    Admin,
}

impl Tier {
    fn config(self) -> RateLimitConfig {
        match self {
            Tier::Public => RateLimitConfig {
                max_requests: 60,
                window: Duration::from_secs(60),
            },
            Tier::Booking => RateLimitConfig {
                max_requests: 5,
                window: Duration::from_secs(300),
            },
            Tier::Agenda => RateLimitConfig {
                max_requests: 30,
                window: Duration::from_secs(60),
            },
            Tier::Admin => RateLimitConfig {
                max_requests: 120,
                window: Duration::from_secs(60),
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RateLimitConfig {
    max_requests: u32,
    window: Duration,
}

// ── Core rate limiter ──

/// In-memory per-IP sliding window counter, keyed by (tier, ip).
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    hits: Arc<DashMap<(Tier, IpAddr), Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a request from `ip` is allowed under `tier`.
    ///
    /// Returns `Ok(())` if allowed, `Err(retry_after_secs)` if rate limited.
    pub fn check(&self, tier: Tier, ip: IpAddr) -> Result<(), u64> {
        let config = tier.config();
        let now = Instant::now();
        let window_start = now - config.window;

        let mut entry = self.hits.entry((tier, ip)).or_default();
        entry.retain(|t| *t > window_start);

        if entry.len() >= config.max_requests as usize {
            // Time until the oldest request leaves the window
            let oldest = entry[0];
            let retry_after = (oldest + config.window)
                .saturating_duration_since(now)
                .as_secs()
                .max(1);
            return Err(retry_after);
        }

        entry.push(now);
        Ok(())
    }

    /// Drop entries older than 2× their tier window. Run periodically from a
    /// background task so idle IPs do not accumulate.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.hits.retain(|(tier, _ip), timestamps| {
            let cutoff = tier.config().window * 2;
            timestamps.retain(|t| now.duration_since(*t) < cutoff);
            !timestamps.is_empty()
        });
    }
}

// ── IP extraction ──

/// Client IP from X-Forwarded-For (reverse proxy) or ConnectInfo.
pub fn extract_client_ip(req: &Request) -> IpAddr {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first_ip) = forwarded.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return ip;
            }
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip())
        .unwrap_or_else(|| IpAddr::from([127, 0, 0, 1]))
}

// ── 429 response ──

fn too_many_requests(retry_after: u64) -> Response {
    let body = ApiResponse::<()>::error(format!(
        "Too many requests. Try again in {} seconds",
        retry_after
    ));
    (
        StatusCode::TOO_MANY_REQUESTS,
        [("Retry-After", retry_after.to_string())],
        Json(body),
    )
        .into_response()
}

async fn rate_limit(
    limiter: RateLimiter,
    tier: Tier,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    let ip = extract_client_ip(&req);
    limiter.check(tier, ip).map_err(too_many_requests)?;
    Ok(next.run(req).await)
}

// ── Middleware functions (one per tier) ──

pub async fn rate_limit_public(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    rate_limit(limiter, Tier::Public, req, next).await
}

pub async fn rate_limit_booking(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    rate_limit(limiter, Tier::Booking, req, next).await
}

pub async fn rate_limit_agenda(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    rate_limit(limiter, Tier::Agenda, req, next).await
}

pub async fn rate_limit_admin(
    State(limiter): State<RateLimiter>,
    req: Request,
    next: Next,
) -> Result<Response, Response> {
    rate_limit(limiter, Tier::Admin, req, next).await
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::thread::sleep;

    fn test_ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn test_allows_requests_under_limit() {
        let limiter = RateLimiter::new();
        let ip = test_ip(1);
        for _ in 0..5 {
            assert!(limiter.check(Tier::Booking, ip).is_ok());
        }
    }

    #[test]
    fn test_rejects_over_limit() {
        let limiter = RateLimiter::new();
        let ip = test_ip(1);
        for _ in 0..5 {
            limiter.check(Tier::Booking, ip).unwrap();
        }
        assert!(limiter.check(Tier::Booking, ip).is_err());
    }

    #[test]
    fn test_returns_retry_after() {
        let limiter = RateLimiter::new();
        let ip = test_ip(1);
        for _ in 0..5 {
            limiter.check(Tier::Booking, ip).unwrap();
        }
        let retry_after = limiter.check(Tier::Booking, ip).unwrap_err();
        assert!(retry_after >= 1 && retry_after <= 300);
    }

    #[test]
    fn test_different_ips_independent() {
        let limiter = RateLimiter::new();
        for _ in 0..5 {
            limiter.check(Tier::Booking, test_ip(1)).unwrap();
        }
        assert!(limiter.check(Tier::Booking, test_ip(1)).is_err());
        assert!(limiter.check(Tier::Booking, test_ip(2)).is_ok());
    }

    #[test]
    fn test_different_tiers_independent() {
        let limiter = RateLimiter::new();
        let ip = test_ip(1);
        for _ in 0..5 {
            limiter.check(Tier::Booking, ip).unwrap();
        }
        assert!(limiter.check(Tier::Booking, ip).is_err());
        assert!(limiter.check(Tier::Public, ip).is_ok());
    }

    #[test]
    fn test_cleanup_preserves_active_entries() {
        let limiter = RateLimiter::new();
        let ip = test_ip(1);
        for _ in 0..4 {
            limiter.check(Tier::Booking, ip).unwrap();
        }

        limiter.cleanup();

        limiter.check(Tier::Booking, ip).unwrap();
        assert!(limiter.check(Tier::Booking, ip).is_err());
    }

    #[test]
    fn test_cleanup_after_idle_does_not_lock_out() {
        let limiter = RateLimiter::new();
        let ip = test_ip(1);
        limiter.check(Tier::Public, ip).unwrap();

        sleep(Duration::from_millis(10));
        limiter.cleanup();

        // Entry still inside its window survives cleanup
        assert!(limiter.check(Tier::Public, ip).is_ok());
    }
}
