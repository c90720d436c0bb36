//! Cross-tenant override for system administrators.
//!
//! [`system_admin_tenant_override`] lets a principal with the
//! [`Capability::CrossTenantAccess`] capability act on another clinic named by
//! the target header (`x-target-clinic-id` by default). Every successful
//! override is audited.

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use medeez_auth::{Capability, ClinicId};
use medeez_core::AppError;
use medeez_observability::AuditEvent;
use tracing::warn;

use crate::middleware::auth::{AuthContext, USER_CONTEXT_MISSING};
use crate::middleware::tenant::{
    CROSS_TENANT_DENIED, TenantContext, collect_references, first_mismatch,
};
use crate::state::AppState;

pub const TARGET_HEADER_REQUIRED: &str =
    "x-target-clinic-id header required for cross-tenant access";
pub const OVERRIDE_FORBIDDEN: &str = "Insufficient permissions for cross-tenant access";
pub const INVALID_TARGET: &str = "Invalid target clinic identifier";

/// Reasons an override request is refused, in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideRejection {
    MissingTarget,
    NotPermitted,
    InvalidTarget,
}

impl OverrideRejection {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingTarget => TARGET_HEADER_REQUIRED,
            Self::NotPermitted => OVERRIDE_FORBIDDEN,
            Self::InvalidTarget => INVALID_TARGET,
        }
    }

    pub fn into_error(self) -> AppError {
        match self {
            Self::NotPermitted => AppError::forbidden(self.message()),
            Self::MissingTarget | Self::InvalidTarget => AppError::bad_request(self.message()),
        }
    }
}

/// Resolve the override target for `context`.
///
/// Header presence is checked before the capability so a missing header is
/// always a 400, then the capability, then the identifier format.
pub fn resolve_target(
    context: &AuthContext,
    target: Option<&HeaderValue>,
) -> Result<ClinicId, OverrideRejection> {
    let target = target.ok_or(OverrideRejection::MissingTarget)?;

    if !context.principal.has_capability(Capability::CrossTenantAccess) {
        return Err(OverrideRejection::NotPermitted);
    }

    target
        .to_str()
        .ok()
        .and_then(|value| ClinicId::new(value).ok())
        .ok_or(OverrideRejection::InvalidTarget)
}

/// Override middleware for `axum::middleware::from_fn_with_state`.
///
/// Any clinic references elsewhere on the request (path, header, query, body)
/// must name the target clinic.
pub async fn system_admin_tenant_override(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth = req
        .extensions()
        .get::<AuthContext>()
        .cloned()
        .ok_or_else(|| AppError::unauthorized(USER_CONTEXT_MISSING))?;

    let target = resolve_target(
        &auth,
        req.headers().get(state.tenant_config.target_header.as_str()),
    );
    let target = match target {
        Ok(target) => target,
        Err(rejection) => {
            state.report(AuditEvent::OverrideDenied {
                user_id: auth.principal.user_id.clone(),
                clinic_id: auth.tenant_id().to_string(),
                reason: rejection.message().to_string(),
                path: req.uri().path().to_string(),
            });
            return Err(rejection.into_error());
        }
    };

    let (mut req, references) = collect_references(req, &state.tenant_config).await?;

    if let Some(violation) = first_mismatch(&target, &references) {
        state.report(AuditEvent::TenantViolation {
            user_id: auth.principal.user_id.clone(),
            clinic_id: target.to_string(),
            source: violation.source,
            attempted: violation.value.clone().unwrap_or_default(),
            path: req.uri().path().to_string(),
        });
        return Err(AppError::forbidden(CROSS_TENANT_DENIED));
    }

    warn!(
        user_id = %auth.principal.user_id,
        home_clinic_id = %auth.tenant_id(),
        target_clinic_id = %target,
        "System admin cross-tenant access"
    );
    state.report(AuditEvent::CrossTenantOverride {
        user_id: auth.principal.user_id.clone(),
        home_clinic_id: auth.tenant_id().to_string(),
        target_clinic_id: target.to_string(),
        path: req.uri().path().to_string(),
    });

    req.extensions_mut().insert(TenantContext {
        clinic_id: target,
        overridden: true,
    });
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use medeez_auth::{Principal, Role};
    use medeez_core::PermissionSet;

    fn context(role: Role) -> AuthContext {
        AuthContext::new(Principal {
            user_id: "admin-1".to_string(),
            email: "root@medeez.test".to_string(),
            clinic_id: ClinicId::new("clinic-home").unwrap(),
            role,
            permissions: PermissionSet::new(),
            is_active: true,
        })
    }

    #[test]
    fn test_missing_header_checked_first() {
        assert_eq!(
            resolve_target(&context(Role::Doctor), None),
            Err(OverrideRejection::MissingTarget)
        );
        assert_eq!(
            resolve_target(&context(Role::SystemAdmin), None),
            Err(OverrideRejection::MissingTarget)
        );
    }

    #[test]
    fn test_non_system_admin_rejected() {
        let header = HeaderValue::from_static("clinic-Z");
        for role in [Role::Staff, Role::Doctor, Role::Admin] {
            assert_eq!(
                resolve_target(&context(role), Some(&header)),
                Err(OverrideRejection::NotPermitted)
            );
        }

        // Capability is checked before format.
        let malformed = HeaderValue::from_static("../etc");
        assert_eq!(
            resolve_target(&context(Role::Admin), Some(&malformed)),
            Err(OverrideRejection::NotPermitted)
        );
    }

    #[test]
    fn test_system_admin_target() {
        let header = HeaderValue::from_static("clinic-Z");
        let target = resolve_target(&context(Role::SystemAdmin), Some(&header)).unwrap();
        assert_eq!(target, "clinic-Z");

        let header = HeaderValue::from_static("target-clinic-id");
        assert!(resolve_target(&context(Role::SystemAdmin), Some(&header)).is_ok());
    }

    #[test]
    fn test_malformed_target_rejected() {
        for raw in ["", "clinic Z", "-leading-dash", "clinic/../other"] {
            let header = HeaderValue::from_str(raw).unwrap();
            assert_eq!(
                resolve_target(&context(Role::SystemAdmin), Some(&header)),
                Err(OverrideRejection::InvalidTarget),
                "{raw:?} should be rejected"
            );
        }

        let too_long = HeaderValue::from_str(&"a".repeat(65)).unwrap();
        assert_eq!(
            resolve_target(&context(Role::SystemAdmin), Some(&too_long)),
            Err(OverrideRejection::InvalidTarget)
        );
    }

    #[test]
    fn test_rejection_statuses() {
        assert_eq!(
            OverrideRejection::MissingTarget.into_error().status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            OverrideRejection::NotPermitted.into_error().status,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            OverrideRejection::InvalidTarget.into_error().status,
            StatusCode::BAD_REQUEST
        );
    }
}
