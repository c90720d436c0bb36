use std::sync::Arc;

use medeez_auth::{JwtVerifier, TokenVerifier};
use medeez_config::{CorsConfig, JwtConfig, RateLimitConfig, TenantConfig};
use medeez_observability::{
    AuditEvent, AuditSink, PrometheusHandle, TracingAuditSink, track_audit_event,
};

use crate::middleware::rate_limit::CallerRateLimiter;

/// Shared application state.
///
/// Collaborators (token verifier, audit sink) are constructed explicitly and
/// passed in, so tests can swap them without touching globals.
#[derive(Clone)]
pub struct AppState {
    pub jwt_config: JwtConfig,
    pub tenant_config: Arc<TenantConfig>,
    pub cors_config: CorsConfig,
    pub verifier: Arc<dyn TokenVerifier>,
    pub audit: Arc<dyn AuditSink>,
    pub metrics: Option<PrometheusHandle>,
    pub rate_limiter: Option<CallerRateLimiter>,
}

impl AppState {
    /// State with the HS256 verifier for `jwt_config` and a tracing audit sink.
    pub fn new(
        jwt_config: JwtConfig,
        tenant_config: TenantConfig,
        cors_config: CorsConfig,
    ) -> Self {
        Self {
            verifier: Arc::new(JwtVerifier::new(&jwt_config)),
            audit: Arc::new(TracingAuditSink),
            jwt_config,
            tenant_config: Arc::new(tenant_config),
            cors_config,
            metrics: None,
            rate_limiter: None,
        }
    }

    pub fn with_verifier(mut self, verifier: Arc<dyn TokenVerifier>) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn with_audit_sink(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }

    /// Enable per-caller rate limiting. A disabled config removes the limiter.
    pub fn with_rate_limit(mut self, config: &RateLimitConfig) -> Self {
        self.rate_limiter = CallerRateLimiter::new(config);
        self
    }

    /// Record a security event on the audit sink and the metrics counters.
    pub fn report(&self, event: AuditEvent) {
        track_audit_event(&event);
        self.audit.record(event);
    }
}

pub fn init_app_state() -> AppState {
    AppState::new(
        JwtConfig::from_env(),
        TenantConfig::from_env(),
        CorsConfig::from_env(),
    )
    .with_rate_limit(&RateLimitConfig::from_env())
}
