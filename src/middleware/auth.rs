//! Bearer token authentication.
//!
//! [`authenticate`] validates the `Authorization` header, verifies the token
//! through the injected [`TokenVerifier`], rejects inactive accounts and
//! stores an [`AuthContext`] in the request extensions. Handlers read it back
//! with the [`AuthUser`] extractor.
//!
//! [`optional_authenticate`] is the lenient variant for routes that serve
//! anonymous callers too; handlers take `Option<AuthUser>` there.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use medeez_auth::{Capability, ClinicId, Principal, Role, TokenError, TokenVerifier};
use medeez_core::{AppError, PermissionSet};
use medeez_observability::AuditEvent;
use tracing::debug;

use crate::state::AppState;

pub const USER_CONTEXT_MISSING: &str = "User context missing";

/// Why a request failed authentication. Every variant maps to a 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingHeader,
    InvalidHeaderFormat,
    Token(TokenError),
    InactiveAccount,
}

impl AuthRejection {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingHeader => "Authorization header required",
            Self::InvalidHeaderFormat => "Invalid authorization header format",
            Self::Token(TokenError::Expired) => "Token has expired",
            Self::Token(TokenError::Malformed) => "Invalid token format",
            Self::Token(TokenError::Invalid) => "Invalid or expired token",
            Self::InactiveAccount => "User account is inactive",
        }
    }

    pub fn into_error(self) -> AppError {
        AppError::unauthorized(self.message())
    }
}

/// Request-scoped identity, inserted by [`authenticate`].
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub principal: Arc<Principal>,
}

impl AuthContext {
    pub fn new(principal: Principal) -> Self {
        Self {
            principal: Arc::new(principal),
        }
    }

    /// The principal's home clinic.
    pub fn tenant_id(&self) -> &ClinicId {
        &self.principal.clinic_id
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.principal.permissions
    }
}

/// Extract the bearer token from the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthRejection::MissingHeader)?
        .to_str()
        .map_err(|_| AuthRejection::InvalidHeaderFormat)?;

    let (scheme, token) = value
        .split_once(' ')
        .ok_or(AuthRejection::InvalidHeaderFormat)?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthRejection::InvalidHeaderFormat);
    }

    Ok(token)
}

/// Resolve the principal for a request from its headers.
pub fn resolve_principal(
    headers: &HeaderMap,
    verifier: &dyn TokenVerifier,
) -> Result<Principal, AuthRejection> {
    let token = bearer_token(headers)?;
    let claims = verifier.verify(token).map_err(AuthRejection::Token)?;
    let principal = Principal::try_from(claims)
        .map_err(|_| AuthRejection::Token(TokenError::Malformed))?;

    if !principal.is_active {
        return Err(AuthRejection::InactiveAccount);
    }

    Ok(principal)
}

/// Authentication middleware for `axum::middleware::from_fn_with_state`.
///
/// ```rust,ignore
/// let routes = Router::new()
///     .route("/session", get(get_session))
///     .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));
/// ```
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = match resolve_principal(req.headers(), state.verifier.as_ref()) {
        Ok(principal) => principal,
        Err(rejection) => {
            state.report(AuditEvent::AuthFailure {
                reason: rejection.message().to_string(),
                method: req.method().to_string(),
                path: req.uri().path().to_string(),
            });
            return Err(rejection.into_error());
        }
    };

    debug!(
        user_id = %principal.user_id,
        clinic_id = %principal.clinic_id,
        role = %principal.role,
        "User authenticated"
    );

    req.extensions_mut().insert(AuthContext::new(principal));
    Ok(next.run(req).await)
}

/// Like [`authenticate`], but a missing or rejected token lets the request
/// through without an [`AuthContext`] instead of answering 401.
pub async fn optional_authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    match resolve_principal(req.headers(), state.verifier.as_ref()) {
        Ok(principal) => {
            req.extensions_mut().insert(AuthContext::new(principal));
        }
        Err(rejection) => {
            debug!(reason = rejection.message(), "Continuing without authentication");
        }
    }

    next.run(req).await
}

pub(crate) fn auth_context(parts: &Parts) -> Result<AuthContext, AppError> {
    parts
        .extensions
        .get::<AuthContext>()
        .cloned()
        .ok_or_else(|| AppError::unauthorized(USER_CONTEXT_MISSING))
}

/// Extractor for the authenticated principal. Requires [`authenticate`] to
/// have run on the route.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Arc<Principal>);

impl AuthUser {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.0.has_permission(permission)
    }

    pub fn has_any_permission(&self, permissions: &[&str]) -> bool {
        self.0.permissions.contains_any(permissions)
    }

    pub fn has_all_permissions(&self, permissions: &[&str]) -> bool {
        self.0.permissions.contains_all(permissions)
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.0.has_capability(capability)
    }

    pub fn user_id(&self) -> &str {
        &self.0.user_id
    }

    pub fn clinic_id(&self) -> &ClinicId {
        &self.0.clinic_id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(AuthUser(auth_context(parts)?.principal))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<AuthContext>()
            .map(|context| AuthUser(context.principal.clone())))
    }
}
