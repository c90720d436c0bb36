use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    routing::get,
};
use medeez_core::permissions;

use crate::middleware::auth::{authenticate, optional_authenticate};
use crate::middleware::capability::{require_clinic_admin, require_system_admin};
use crate::middleware::permission::require_permission;
use crate::middleware::rate_limit::rate_limit;
use crate::middleware::tenant::tenant_isolation;
use crate::middleware::tenant_override::system_admin_tenant_override;
use crate::state::AppState;

use super::controller::{
    echo_tenant_context, get_clinic_settings, get_session, get_tenant_context, list_notes,
    list_patients, whoami,
};

/// Routes scoped to the caller's own clinic.
fn tenant_routes(state: &AppState) -> Router<AppState> {
    let patients = Router::new()
        .route("/clinics/{clinicId}/patients", get(list_patients))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            tenant_isolation,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            |state: State<AppState>, req: Request, next: Next| {
                require_permission(state, req, next, permissions::PATIENTS_READ)
            },
        ));

    let settings = Router::new()
        .route("/clinics/{clinicId}/settings", get(get_clinic_settings))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            tenant_isolation,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_clinic_admin,
        ));

    Router::new()
        .route(
            "/tenant-context",
            get(get_tenant_context).post(echo_tenant_context),
        )
        .route(
            "/clinics/{clinicId}/session",
            get(get_tenant_context).post(echo_tenant_context),
        )
        .route("/clinics/{clinicId}/notes", get(list_notes))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            tenant_isolation,
        ))
        .merge(patients)
        .merge(settings)
}

/// Routes where a system administrator names the target clinic explicitly.
fn admin_routes(state: &AppState) -> Router<AppState> {
    let console = Router::new()
        .route("/admin/session", get(get_session))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_system_admin,
        ));

    Router::new()
        .route(
            "/admin/clinics/{clinicId}/session",
            get(get_tenant_context).post(echo_tenant_context),
        )
        .route("/admin/tenant-context", get(get_tenant_context))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            system_admin_tenant_override,
        ))
        .merge(console)
}

/// Routes that answer anonymous callers too.
fn public_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/whoami", get(whoami))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            optional_authenticate,
        ))
}

pub fn init_session_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/session", get(get_session))
        .merge(tenant_routes(state))
        .merge(admin_routes(state))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .merge(public_routes(state))
}
