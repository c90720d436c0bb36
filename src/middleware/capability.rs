//! Role gates.
//!
//! Some routes belong to a kind of user rather than to a permission grant:
//! clinic settings are for clinic administrators, platform tooling is for
//! system administrators. These gates ask the principal's role for a
//! [`Capability`] and reject with the same 403 as a missing permission.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use medeez_auth::Capability;
use medeez_core::AppError;
use medeez_observability::AuditEvent;
use tracing::warn;

use crate::middleware::auth::AuthUser;
use crate::middleware::permission::INSUFFICIENT_PERMISSIONS;
use crate::state::AppState;

/// Middleware function that rejects the request unless the authenticated
/// principal's role carries `capability`.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// let routes = Router::new()
///     .route("/clinics/{clinicId}/settings", get(get_settings))
///     .route_layer(middleware::from_fn_with_state(
///         state.clone(),
///         |state: State<AppState>, req: Request, next: Next| {
///             require_capability(state, req, next, Capability::ClinicAdmin)
///         },
///     ));
/// ```
pub async fn require_capability(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    capability: Capability,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &state).await?;

    if !user.has_capability(capability) {
        warn!(
            user_id = %user.user_id(),
            role = %user.role(),
            %capability,
            "Role access denied"
        );
        state.report(AuditEvent::CapabilityDenied {
            user_id: user.user_id().to_string(),
            clinic_id: user.clinic_id().to_string(),
            capability: capability.to_string(),
            path: parts.uri.path().to_string(),
        });
        return Err(AppError::forbidden(INSUFFICIENT_PERMISSIONS));
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Clinic administrators and system administrators.
///
/// ```rust,ignore
/// let settings = Router::new()
///     .route("/clinics/{clinicId}/settings", get(get_settings))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_clinic_admin));
/// ```
pub async fn require_clinic_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_capability(State(state), req, next, Capability::ClinicAdmin).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// System administrators only.
pub async fn require_system_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_capability(State(state), req, next, Capability::CrossTenantAccess).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}
