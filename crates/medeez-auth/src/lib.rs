//! # Medeez Auth
//!
//! Identity types and token handling for the Medeez API.
//!
//! - [`claims`]: access token claims
//! - [`clinic_id`]: validated tenant identifier
//! - [`role`]: roles and the [`Capability`] model
//! - [`principal`]: the authenticated actor built from verified claims
//! - [`jwt`]: token creation, the [`TokenVerifier`] seam and [`JwtVerifier`]
//!
//! # Example
//!
//! ```ignore
//! use medeez_auth::{JwtVerifier, Principal, TokenVerifier};
//!
//! let verifier = JwtVerifier::new(&jwt_config);
//! let claims = verifier.verify(token)?;
//! let principal = Principal::try_from(claims)?;
//! ```

pub mod claims;
pub mod clinic_id;
pub mod jwt;
pub mod principal;
pub mod role;

pub use claims::Claims;
pub use clinic_id::{ClinicId, ClinicIdError};
pub use jwt::{JwtVerifier, TokenError, TokenVerifier, create_access_token, encode_claims};
pub use principal::Principal;
pub use role::{Capability, Role};
