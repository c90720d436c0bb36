//! Per-caller rate limiting.
//!
//! Each caller gets a token bucket sized by
//! [`RateLimitConfig`](medeez_config::RateLimitConfig). Callers are keyed by
//! user id once [`authenticate`](crate::middleware::auth::authenticate) has
//! run, otherwise by peer address. A rejected request gets a 429 with the
//! usual error body and a `Retry-After` header.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, RateLimiter};
use medeez_config::RateLimitConfig;
use medeez_core::AppError;
use medeez_observability::AuditEvent;
use tracing::warn;

use crate::middleware::auth::AuthContext;
use crate::state::AppState;

pub const RATE_LIMITED: &str = "Rate limit exceeded. Too many requests.";

/// Keyed token buckets shared by every clone of the application state.
#[derive(Clone)]
pub struct CallerRateLimiter {
    limiter: Arc<DefaultKeyedRateLimiter<String>>,
    retry_after_secs: u64,
}

impl CallerRateLimiter {
    /// `None` when `config` disables limiting.
    pub fn new(config: &RateLimitConfig) -> Option<Self> {
        let quota = config.quota()?;
        Some(Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
            retry_after_secs: config.retry_after_secs(),
        })
    }

    /// Take one token from `key`'s bucket. `false` when it is empty.
    pub fn check(&self, key: &str) -> bool {
        self.limiter.check_key(&key.to_string()).is_ok()
    }

    pub fn retry_after_secs(&self) -> u64 {
        self.retry_after_secs
    }

    /// Periodically drop buckets that have fully refilled. Must be called
    /// from within a Tokio runtime.
    pub fn spawn_cleanup(&self, every: Duration) {
        let limiter = self.limiter.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(every).await;
                limiter.retain_recent();
            }
        });
    }
}

/// Bucket key for `req`.
pub fn rate_limit_key(req: &Request) -> String {
    if let Some(context) = req.extensions().get::<AuthContext>() {
        return format!("user:{}", context.principal.user_id);
    }

    match req.extensions().get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(addr)) => format!("ip:{}", addr.ip()),
        None => "anonymous".to_string(),
    }
}

/// Rate limiting middleware for `axum::middleware::from_fn_with_state`.
/// Passes everything through when the state carries no limiter.
pub async fn rate_limit(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(limiter) = state.rate_limiter.as_ref() else {
        return next.run(req).await;
    };

    let key = rate_limit_key(&req);
    if limiter.check(&key) {
        return next.run(req).await;
    }

    warn!(%key, method = %req.method(), path = %req.uri().path(), "Rate limit exceeded");
    state.report(AuditEvent::RateLimitExceeded {
        key,
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
    });

    let mut response = AppError::too_many_requests(RATE_LIMITED).into_response();
    response.headers_mut().insert(
        header::RETRY_AFTER,
        HeaderValue::from(limiter.retry_after_secs()),
    );
    response
}
