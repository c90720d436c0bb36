//! Prometheus metrics.
//!
//! Counters are recorded through the `metrics` facade; when no recorder is
//! installed (metrics disabled, or in tests) the calls are no-ops.

use std::time::Duration;

use anyhow::Context;
use axum::{Router, routing::get};
use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
pub use metrics_exporter_prometheus::PrometheusHandle;

use medeez_config::LoggingConfig;

use crate::audit::AuditEvent;

/// Install the Prometheus recorder and spawn its upkeep task.
///
/// Returns `None` when metrics are disabled. Must be called from within a
/// Tokio runtime.
pub fn init_metrics(config: &LoggingConfig) -> anyhow::Result<Option<PrometheusHandle>> {
    if !config.metrics_enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install Prometheus recorder")?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// Router exposing `GET /metrics`.
pub fn metrics_app<S>(handle: PrometheusHandle) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

pub fn track_audit_event(event: &AuditEvent) {
    match event {
        AuditEvent::AuthFailure { reason, .. } => {
            counter!("auth_rejections_total", "reason" => reason.clone()).increment(1);
        }
        AuditEvent::PermissionDenied { permission, .. } => {
            counter!("permission_denials_total", "permission" => permission.clone()).increment(1);
        }
        AuditEvent::TenantViolation { source, .. } => {
            counter!("tenant_violations_total", "source" => source.as_str()).increment(1);
        }
        AuditEvent::CapabilityDenied { capability, .. } => {
            counter!("capability_denials_total", "capability" => capability.clone()).increment(1);
        }
        AuditEvent::RateLimitExceeded { .. } => {
            counter!("rate_limit_rejections_total").increment(1);
        }
        AuditEvent::OverrideDenied { .. } => {
            counter!("tenant_override_denials_total").increment(1);
        }
        AuditEvent::CrossTenantOverride { .. } => {
            counter!("tenant_overrides_total").increment(1);
        }
    }
}
