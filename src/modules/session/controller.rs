use axum::Json;
use serde_json::Value;

use crate::middleware::auth::AuthUser;
use crate::middleware::permission::RequireNotesRead;
use crate::middleware::tenant::Tenant;

use super::model::{
    EchoResponse, ResourceScopeResponse, SessionResponse, TenantResponse, WhoAmIResponse,
};

pub async fn get_session(user: AuthUser) -> Json<SessionResponse> {
    Json(SessionResponse::from(user.0.as_ref()))
}

pub async fn whoami(user: Option<AuthUser>) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse::from(user.as_ref().map(|u| u.0.as_ref())))
}

pub async fn get_tenant_context(user: AuthUser, Tenant(tenant): Tenant) -> Json<TenantResponse> {
    Json(TenantResponse::new(&user.0, tenant))
}

pub async fn echo_tenant_context(
    user: AuthUser,
    Tenant(tenant): Tenant,
    Json(body): Json<Value>,
) -> Json<EchoResponse> {
    Json(EchoResponse {
        tenant: TenantResponse::new(&user.0, tenant),
        body,
    })
}

/// Gated by the `patients:read` permission layer on the router.
pub async fn list_patients(
    user: AuthUser,
    Tenant(tenant): Tenant,
) -> Json<ResourceScopeResponse> {
    Json(ResourceScopeResponse {
        resource: "patients",
        clinic_id: tenant.clinic_id,
        requested_by: user.user_id().to_string(),
    })
}

pub async fn list_notes(
    RequireNotesRead(user): RequireNotesRead,
    Tenant(tenant): Tenant,
) -> Json<ResourceScopeResponse> {
    Json(ResourceScopeResponse {
        resource: "notes",
        clinic_id: tenant.clinic_id,
        requested_by: user.user_id().to_string(),
    })
}

/// Gated by the clinic administrator layer on the router.
pub async fn get_clinic_settings(
    user: AuthUser,
    Tenant(tenant): Tenant,
) -> Json<ResourceScopeResponse> {
    Json(ResourceScopeResponse {
        resource: "settings",
        clinic_id: tenant.clinic_id,
        requested_by: user.user_id().to_string(),
    })
}
