//! # Medeez Core
//!
//! Foundational types shared by every Medeez crate:
//!
//! - [`errors`]: [`AppError`] and the JSON error body written for rejected requests
//! - [`permissions`]: permission name constants and [`PermissionSet`]
//! - [`tenant`]: [`TenantSource`], the places a tenant id can appear on a request
//!
//! # Example
//!
//! ```ignore
//! use medeez_core::{AppError, permissions};
//!
//! if !granted.contains(permissions::PATIENTS_WRITE) {
//!     return Err(AppError::forbidden("Insufficient permissions"));
//! }
//! ```

pub mod errors;
pub mod permissions;
pub mod tenant;

pub use errors::{AppError, ErrorBody, ErrorKind};
pub use permissions::PermissionSet;
pub use tenant::TenantSource;
