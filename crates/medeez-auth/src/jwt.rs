//! JWT issuing and verification.
//!
//! Tokens are HS256-signed with the secret from [`JwtConfig`]. Verification
//! goes through the [`TokenVerifier`] trait so the HTTP layer can be handed
//! any verifier (the production [`JwtVerifier`], or a stub in tests) through
//! application state.
//!
//! # Example
//!
//! ```ignore
//! use medeez_auth::{JwtVerifier, TokenVerifier, create_access_token};
//!
//! let token = create_access_token("user-1", "doc@clinic.test", &clinic_id, Role::Doctor,
//!     vec!["patients:read".to_string()], &config)?;
//! let claims = JwtVerifier::new(&config).verify(&token)?;
//! ```

use std::fmt;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use medeez_config::JwtConfig;
use medeez_core::AppError;

use crate::claims::Claims;
use crate::clinic_id::ClinicId;
use crate::role::Role;

/// Why a token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Signature was valid but `exp` has passed.
    Expired,
    /// The token could not be parsed: wrong segment count, bad base64, bad
    /// JSON, or claims of the wrong shape.
    Malformed,
    /// Anything else: bad signature, wrong algorithm, issuer or audience.
    Invalid,
}

impl std::error::Error for TokenError {}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => f.write_str("Token has expired"),
            Self::Malformed => f.write_str("Invalid token format"),
            Self::Invalid => f.write_str("Invalid or expired token"),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            JwtErrorKind::ExpiredSignature => Self::Expired,
            JwtErrorKind::InvalidToken
            | JwtErrorKind::Base64(_)
            | JwtErrorKind::Json(_)
            | JwtErrorKind::Utf8(_) => Self::Malformed,
            _ => Self::Invalid,
        }
    }
}

/// Verifies a bearer token and returns its claims.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, TokenError>;
}

/// HS256 verifier backed by [`JwtConfig`].
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(jwt_config: &JwtConfig) -> Self {
        let mut validation = Validation::default();
        validation.leeway = jwt_config.leeway;

        if let Some(issuer) = &jwt_config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &jwt_config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(jwt_config.secret.as_bytes()),
            validation,
        }
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::from)
    }
}

/// Signs arbitrary claims. Used directly by tooling that needs full control
/// over `exp`/`iat`; application code goes through [`create_access_token`].
pub fn encode_claims(claims: &Claims, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

/// Creates an access token for an active user.
pub fn create_access_token(
    user_id: &str,
    email: &str,
    clinic_id: &ClinicId,
    role: Role,
    permissions: Vec<String>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        clinic_id: clinic_id.to_string(),
        role,
        permissions,
        is_active: true,
        iss: jwt_config.issuer.clone(),
        aud: jwt_config.audience.clone(),
        exp,
        iat: now,
    };

    encode_claims(&claims, jwt_config)
}
