//! # Medeez API
//!
//! Tenant isolation and permission enforcement for the Medeez practice
//! management API, served with Axum.
//!
//! ## Request Pipeline
//!
//! ```text
//! request
//!   → authenticate                  401 on a missing, invalid or expired token, or an inactive account
//!   → rate_limit                    429 once the caller's bucket is empty
//!   → require_permission (optional) 403 when the permission set lacks the grant
//!     or a role gate
//!   → tenant_isolation              403 when any clinic reference differs from the principal's clinic
//!     or system_admin_tenant_override
//!   → handler
//! ```
//!
//! Every rejection is a JSON body of the form
//! `{ "error": "FORBIDDEN", "message": "...", "timestamp": "..." }` and never
//! contains a clinic identifier.
//!
//! ## Tenant References
//!
//! A request can name a clinic in:
//!
//! | Source | Default name |
//! |--------|--------------|
//! | Path parameter | `clinicId`, `clinic_id` |
//! | Header | `x-clinic-id` |
//! | Query parameter | `clinicId` |
//! | JSON body field | `clinicId` |
//!
//! All references present must equal the principal's clinic. System
//! administrators may act on another clinic by sending `x-target-clinic-id`
//! to routes guarded by the override middleware.
//!
//! ## Environment Variables
//!
//! ```bash
//! JWT_SECRET=your-secure-secret-key
//! JWT_ACCESS_EXPIRY=3600
//! TENANT_HEADER=x-clinic-id
//! SERVER_ADDR=0.0.0.0:3000
//! LOG_FORMAT=json
//! ```
//!
//! ## Issuing a Development Token
//!
//! ```bash
//! cargo run --bin medeez-cli -- issue-token --sub user-1 --email doc@clinic.test \
//!     --clinic clinic-A --role doctor --permission patients:read
//! ```
//!
//! ## Modules
//!
//! - [`middleware`]: authentication, permission and tenant middleware
//! - [`modules`]: route handlers
//! - [`router`]: main application router
//! - [`state`]: shared application state

pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

// Re-export workspace crates for convenience
pub use medeez_auth;
pub use medeez_config;
pub use medeez_core;
pub use medeez_observability;
