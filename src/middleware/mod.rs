//! Middleware modules for request processing.
//!
//! # Modules
//!
//! - [`auth`]: bearer token authentication and the [`AuthUser`](auth::AuthUser) extractor
//! - [`permission`]: permission gates, as middleware or as `Require*` extractors
//! - [`capability`]: role gates for clinic and system administrators
//! - [`rate_limit`]: per-caller request quota
//! - [`tenant`]: tenant isolation and the [`Tenant`](tenant::Tenant) extractor
//! - [`tenant_override`]: cross-tenant access for system administrators
//!
//! # Request Flow
//!
//! 1. `authenticate` verifies the `Authorization: Bearer <token>` header and
//!    stores an `AuthContext`
//! 2. `rate_limit` spends one token from the caller's bucket
//! 3. `require_permission` or a role gate (optional) checks the principal
//! 4. `tenant_isolation` or `system_admin_tenant_override` resolves the
//!    effective clinic and stores a `TenantContext`
//! 5. Handler executes if all checks pass
//!
//! With `route_layer`, the layer added last runs first, so routes list the
//! tenant layer before the auth layer.
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::{auth::AuthUser, tenant::Tenant};
//!
//! async fn list_patients(user: AuthUser, Tenant(tenant): Tenant) -> impl IntoResponse {
//!     // tenant.clinic_id is the only clinic this handler may touch
//! }
//! ```

pub mod auth;
pub mod capability;
pub mod permission;
pub mod rate_limit;
pub mod tenant;
pub mod tenant_override;
