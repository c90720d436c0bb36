//! Permission gates.
//!
//! Two ways to require a permission on a route:
//! 1. Layer-based with [`require_permission`] and `from_fn_with_state`
//! 2. Extractor-based with the `Require*` types generated by
//!    [`require_permission!`](crate::require_permission)
//!
//! Both consult only the principal's [`PermissionSet`](medeez_core::PermissionSet),
//! never its role.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use medeez_core::AppError;
use medeez_observability::AuditEvent;

use crate::middleware::auth::{AuthContext, USER_CONTEXT_MISSING};
use crate::state::AppState;

pub const INSUFFICIENT_PERMISSIONS: &str = "Insufficient permissions";

/// Decide whether `context` grants `permission`.
pub fn check_permission(context: Option<&AuthContext>, permission: &str) -> Result<(), AppError> {
    let context = context.ok_or_else(|| AppError::unauthorized(USER_CONTEXT_MISSING))?;

    if context.permissions().contains(permission) {
        Ok(())
    } else {
        Err(AppError::forbidden(INSUFFICIENT_PERMISSIONS))
    }
}

#[doc(hidden)]
pub fn report_denied(state: &AppState, context: &AuthContext, permission: &str, path: &str) {
    state.report(AuditEvent::PermissionDenied {
        user_id: context.principal.user_id.clone(),
        clinic_id: context.tenant_id().to_string(),
        permission: permission.to_string(),
        path: path.to_string(),
    });
}

/// Middleware function that rejects the request unless the authenticated
/// principal holds `permission`.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// let routes = Router::new()
///     .route("/patients", get(list_patients))
///     .route_layer(middleware::from_fn_with_state(
///         state.clone(),
///         |state: State<AppState>, req: Request, next: Next| {
///             require_permission(state, req, next, permissions::PATIENTS_READ)
///         },
///     ));
/// ```
pub async fn require_permission(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    permission: &'static str,
) -> Result<Response, AppError> {
    let context = req.extensions().get::<AuthContext>();

    if let Err(err) = check_permission(context, permission) {
        if let Some(context) = context {
            report_denied(&state, context, permission, req.uri().path());
        }
        return Err(err);
    }

    Ok(next.run(req).await)
}

/// Generates an extractor that resolves to the [`AuthUser`] when the
/// principal holds the given permission.
///
/// [`AuthUser`]: crate::middleware::auth::AuthUser
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $permission:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = $crate::medeez_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let context = parts
                    .extensions
                    .get::<$crate::middleware::auth::AuthContext>()
                    .cloned();

                if let Err(err) =
                    $crate::middleware::permission::check_permission(context.as_ref(), $permission)
                {
                    if let Some(context) = &context {
                        $crate::middleware::permission::report_denied(
                            state,
                            context,
                            $permission,
                            parts.uri.path(),
                        );
                    }
                    return Err(err);
                }

                let principal = context.map(|c| c.principal).ok_or_else(|| {
                    $crate::medeez_core::AppError::unauthorized(
                        $crate::middleware::auth::USER_CONTEXT_MISSING,
                    )
                })?;
                Ok($name($crate::middleware::auth::AuthUser(principal)))
            }
        }
    };
}

// Patients
require_permission!(RequirePatientsRead, medeez_core::permissions::PATIENTS_READ);
require_permission!(RequirePatientsWrite, medeez_core::permissions::PATIENTS_WRITE);

// Appointments
require_permission!(RequireAppointmentsRead, medeez_core::permissions::APPOINTMENTS_READ);
require_permission!(RequireAppointmentsWrite, medeez_core::permissions::APPOINTMENTS_WRITE);

// Clinical notes
require_permission!(RequireNotesRead, medeez_core::permissions::NOTES_READ);
require_permission!(RequireNotesWrite, medeez_core::permissions::NOTES_WRITE);

// Invoices
require_permission!(RequireInvoicesRead, medeez_core::permissions::INVOICES_READ);
require_permission!(RequireInvoicesWrite, medeez_core::permissions::INVOICES_WRITE);

// Settings
require_permission!(RequireSettingsRead, medeez_core::permissions::SETTINGS_READ);
require_permission!(RequireSettingsWrite, medeez_core::permissions::SETTINGS_WRITE);
