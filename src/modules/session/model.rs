use medeez_auth::{ClinicId, Principal, Role};
use medeez_core::PermissionSet;
use serde::Serialize;
use serde_json::Value;

use crate::middleware::tenant::TenantContext;

/// The authenticated principal as seen by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: String,
    pub email: String,
    pub clinic_id: ClinicId,
    pub role: Role,
    pub permissions: PermissionSet,
}

impl From<&Principal> for SessionResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            user_id: principal.user_id.clone(),
            email: principal.email.clone(),
            clinic_id: principal.clinic_id.clone(),
            role: principal.role,
            permissions: principal.permissions.clone(),
        }
    }
}

/// Effective tenant for the current request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantResponse {
    pub user_id: String,
    pub home_clinic_id: ClinicId,
    pub clinic_id: ClinicId,
    pub overridden: bool,
}

impl TenantResponse {
    pub fn new(principal: &Principal, tenant: TenantContext) -> Self {
        Self {
            user_id: principal.user_id.clone(),
            home_clinic_id: principal.clinic_id.clone(),
            clinic_id: tenant.clinic_id,
            overridden: tenant.overridden,
        }
    }
}

/// Tenant context plus the request body exactly as the handler received it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoResponse {
    #[serde(flatten)]
    pub tenant: TenantResponse,
    pub body: Value,
}

/// Scope a clinic resource listing resolved to.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceScopeResponse {
    pub resource: &'static str,
    pub clinic_id: ClinicId,
    pub requested_by: String,
}

/// Caller identity on routes that also serve anonymous requests.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoAmIResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinic_id: Option<ClinicId>,
}

impl From<Option<&Principal>> for WhoAmIResponse {
    fn from(principal: Option<&Principal>) -> Self {
        Self {
            authenticated: principal.is_some(),
            user_id: principal.map(|p| p.user_id.clone()),
            clinic_id: principal.map(|p| p.clinic_id.clone()),
        }
    }
}
