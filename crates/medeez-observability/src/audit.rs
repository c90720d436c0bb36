//! Security audit events.
//!
//! Middleware reports every rejection and every cross-tenant override as an
//! [`AuditEvent`] on an [`AuditSink`]. The sink is injected through
//! application state; [`TracingAuditSink`] writes structured events under the
//! `audit` target so they can be routed to a dedicated log stream.

use std::sync::Mutex;

use medeez_core::TenantSource;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    AuthFailure {
        reason: String,
        method: String,
        path: String,
    },
    PermissionDenied {
        user_id: String,
        clinic_id: String,
        permission: String,
        path: String,
    },
    TenantViolation {
        user_id: String,
        clinic_id: String,
        source: TenantSource,
        attempted: String,
        path: String,
    },
    CapabilityDenied {
        user_id: String,
        clinic_id: String,
        capability: String,
        path: String,
    },
    RateLimitExceeded {
        key: String,
        method: String,
        path: String,
    },
    OverrideDenied {
        user_id: String,
        clinic_id: String,
        reason: String,
        path: String,
    },
    CrossTenantOverride {
        user_id: String,
        home_clinic_id: String,
        target_clinic_id: String,
        path: String,
    },
}

impl AuditEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AuthFailure { .. } => "auth_failure",
            Self::PermissionDenied { .. } => "permission_denied",
            Self::TenantViolation { .. } => "tenant_isolation_violation",
            Self::CapabilityDenied { .. } => "role_access_denied",
            Self::RateLimitExceeded { .. } => "rate_limit_exceeded",
            Self::OverrideDenied { .. } => "tenant_override_denied",
            Self::CrossTenantOverride { .. } => "system_admin_cross_tenant_access",
        }
    }
}

pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        match &event {
            AuditEvent::AuthFailure {
                reason,
                method,
                path,
            } => {
                warn!(target: "audit", event = event.name(), %reason, %method, %path, "authentication rejected");
            }
            AuditEvent::PermissionDenied {
                user_id,
                clinic_id,
                permission,
                path,
            } => {
                warn!(target: "audit", event = event.name(), %user_id, %clinic_id, %permission, %path, "permission denied");
            }
            AuditEvent::TenantViolation {
                user_id,
                clinic_id,
                source,
                attempted,
                path,
            } => {
                warn!(target: "audit", event = event.name(), %user_id, %clinic_id, %source, %attempted, %path, "cross-tenant access blocked");
            }
            AuditEvent::CapabilityDenied {
                user_id,
                clinic_id,
                capability,
                path,
            } => {
                warn!(target: "audit", event = event.name(), %user_id, %clinic_id, %capability, %path, "role access denied");
            }
            AuditEvent::RateLimitExceeded { key, method, path } => {
                warn!(target: "audit", event = event.name(), %key, %method, %path, "rate limit exceeded");
            }
            AuditEvent::OverrideDenied {
                user_id,
                clinic_id,
                reason,
                path,
            } => {
                warn!(target: "audit", event = event.name(), %user_id, %clinic_id, %reason, %path, "tenant override denied");
            }
            AuditEvent::CrossTenantOverride {
                user_id,
                home_clinic_id,
                target_clinic_id,
                path,
            } => {
                if home_clinic_id == target_clinic_id {
                    info!(target: "audit", event = event.name(), %user_id, %target_clinic_id, %path, "tenant override to home clinic");
                } else {
                    warn!(target: "audit", event = event.name(), %user_id, %home_clinic_id, %target_clinic_id, %path, "system admin cross-tenant access");
                }
            }
        }
    }
}

/// Keeps events in memory. Used by tests to assert on what was audited.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation() -> AuditEvent {
        AuditEvent::TenantViolation {
            user_id: "user-1".to_string(),
            clinic_id: "clinic-A".to_string(),
            source: TenantSource::Header,
            attempted: "clinic-B".to_string(),
            path: "/api/clinics/{clinicId}/session".to_string(),
        }
    }

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemoryAuditSink::new();
        sink.record(violation());
        sink.record(AuditEvent::AuthFailure {
            reason: "Token has expired".to_string(),
            method: "GET".to_string(),
            path: "/api/session".to_string(),
        });

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name(), "tenant_isolation_violation");
        assert_eq!(events[1].name(), "auth_failure");

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let json = serde_json::to_value(violation()).unwrap();
        assert_eq!(json["event"], "tenant_violation");
        assert_eq!(json["source"], "header");
    }

    #[test]
    fn test_event_names() {
        let denied = AuditEvent::CapabilityDenied {
            user_id: "user-1".to_string(),
            clinic_id: "clinic-A".to_string(),
            capability: "clinic_admin".to_string(),
            path: "/api/clinics/clinic-A/settings".to_string(),
        };
        let limited = AuditEvent::RateLimitExceeded {
            key: "user:user-1".to_string(),
            method: "GET".to_string(),
            path: "/api/session".to_string(),
        };

        assert_eq!(denied.name(), "role_access_denied");
        assert_eq!(limited.name(), "rate_limit_exceeded");
        assert_eq!(serde_json::to_value(limited).unwrap()["event"], "rate_limit_exceeded");
    }

    #[test]
    fn test_tracing_sink_does_not_panic_without_subscriber() {
        TracingAuditSink.record(violation());
    }
}
