/**
 * Rate Limiting Middleware
 *
 * Fixed-window limiter applied to every matched `/api` route. Each client
 * identity gets `max_requests` per window; the window starts with the
 * client's first request and resets once it has elapsed.
 *
 * # Client Identity
 *
 * 1. Peer address from `ConnectInfo`
 * 2. A shared `unknown` bucket
 *
 * With `trust_proxy` set, the first `X-Forwarded-For` hop takes precedence.
 * Any caller can write that header, so it is ignored otherwise.
 */

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::backend::error::BackendError;
use crate::backend::server::config::RateLimitConfig;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of a rate-limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<String, Window>>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Window>> {
        self.windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn check(&self, key: &str) -> RateLimitDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateLimitDecision {
        let mut windows = self.lock();
        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.config.window {
            *window = Window { started: now, count: 0 };
        }

        if window.count >= self.config.max_requests {
            let elapsed = now.duration_since(window.started);
            return RateLimitDecision::Limited {
                retry_after: self.config.window.saturating_sub(elapsed),
            };
        }

        window.count += 1;
        RateLimitDecision::Allowed {
            remaining: self.config.max_requests - window.count,
        }
    }

    /// Drop windows that have fully elapsed
    pub fn prune_expired(&self) {
        let now = Instant::now();
        let window = self.config.window;
        self.lock()
            .retain(|_, entry| now.duration_since(entry.started) < window);
    }

    pub fn tracked_clients(&self) -> usize {
        self.lock().len()
    }
}

fn forwarded_for(request: &Request) -> Option<&str> {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(str::trim)
        .filter(|h| !h.is_empty())
}

fn client_key(request: &Request, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(forwarded) = forwarded_for(request) {
            return forwarded.to_string();
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limiting middleware
///
/// Returns 429 with a `Retry-After` header once the client's window is full.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let key = client_key(&request, limiter.config.trust_proxy);

    match limiter.check(&key) {
        RateLimitDecision::Allowed { .. } => Ok(next.run(request).await),
        RateLimitDecision::Limited { retry_after } => {
            tracing::warn!("Rate limit exceeded for {}", key);
            Err(BackendError::RateLimited {
                retry_after_secs: retry_after.as_secs().max(1),
            })
        }
    }
}
