//! Tenant isolation.
//!
//! [`tenant_isolation`] collects every clinic identifier a request refers to
//! (path parameters, the tenant header, the query string and the JSON body)
//! and rejects the request unless all of them equal the authenticated
//! principal's clinic. On success a [`TenantContext`] is stored in the request
//! extensions for the [`Tenant`] extractor.
//!
//! Must be installed with `route_layer` so matched path parameters are
//! visible, and after [`authenticate`](crate::middleware::auth::authenticate).

use axum::{
    body::{Body, Bytes, to_bytes},
    extract::{
        FromRequestParts, Query, RawPathParams, Request, State, rejection::RawPathParamsRejection,
    },
    http::{HeaderMap, Uri, header, request::Parts},
    middleware::Next,
    response::Response,
};
use medeez_auth::ClinicId;
use medeez_config::TenantConfig;
use medeez_core::{AppError, TenantSource};
use medeez_observability::AuditEvent;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::middleware::auth::{AuthContext, USER_CONTEXT_MISSING};
use crate::state::AppState;

pub const CROSS_TENANT_DENIED: &str = "Access denied: Cross-tenant access not allowed";
pub const CROSS_TENANT_DATA_DENIED: &str = "Cross-tenant data access denied";
pub const BODY_UNREADABLE: &str = "Request body could not be read";
pub const TENANT_CONTEXT_MISSING: &str = "Tenant context missing";

/// A clinic identifier found on the request.
///
/// `value` is `None` when the source held something that cannot be compared
/// as text (a non-UTF-8 header, a number in the JSON body). Such references
/// never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantReference {
    pub source: TenantSource,
    pub value: Option<String>,
}

impl TenantReference {
    fn new(source: TenantSource, value: impl Into<String>) -> Self {
        Self {
            source,
            value: Some(value.into()),
        }
    }

    fn opaque(source: TenantSource) -> Self {
        Self {
            source,
            value: None,
        }
    }

    pub fn matches(&self, clinic_id: &ClinicId) -> bool {
        self.value.as_deref() == Some(clinic_id.as_str())
    }
}

/// Effective tenant for downstream handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantContext {
    pub clinic_id: ClinicId,
    /// Set when a system administrator is acting on another clinic.
    pub overridden: bool,
}

/// First reference that does not equal `expected`, if any.
pub fn first_mismatch<'a>(
    expected: &ClinicId,
    references: &'a [TenantReference],
) -> Option<&'a TenantReference> {
    references.iter().find(|r| !r.matches(expected))
}

async fn path_references(parts: &mut Parts, config: &TenantConfig) -> Vec<TenantReference> {
    let params = match RawPathParams::from_request_parts(parts, &()).await {
        Ok(params) => params,
        Err(RawPathParamsRejection::InvalidUtf8InPathParam(_)) => {
            return vec![TenantReference::opaque(TenantSource::Path)];
        }
        Err(_) => return Vec::new(),
    };

    params
        .iter()
        .filter(|(key, _)| config.path_params.iter().any(|p| p.as_str() == *key))
        .map(|(_, value)| TenantReference::new(TenantSource::Path, value))
        .collect()
}

fn header_references(headers: &HeaderMap, config: &TenantConfig) -> Vec<TenantReference> {
    headers
        .get_all(config.header.as_str())
        .iter()
        .map(|value| match value.to_str() {
            Ok(value) => TenantReference::new(TenantSource::Header, value),
            Err(_) => TenantReference::opaque(TenantSource::Header),
        })
        .collect()
}

fn query_references(uri: &Uri, config: &TenantConfig) -> Vec<TenantReference> {
    let Ok(Query(pairs)) = Query::<Vec<(String, String)>>::try_from_uri(uri) else {
        return Vec::new();
    };

    pairs
        .into_iter()
        .filter(|(key, _)| *key == config.query_param)
        .map(|(_, value)| TenantReference::new(TenantSource::Query, value))
        .collect()
}

fn is_json(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

fn body_reference(bytes: &Bytes, config: &TenantConfig) -> Option<TenantReference> {
    let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(bytes) else {
        return None;
    };

    match map.get(&config.body_field)? {
        Value::Null => None,
        Value::String(value) => Some(TenantReference::new(TenantSource::Body, value.as_str())),
        _ => Some(TenantReference::opaque(TenantSource::Body)),
    }
}

/// Collect every clinic reference on `req`.
///
/// JSON bodies are buffered (up to `max_body_bytes`) and put back so the
/// handler can still read them.
pub async fn collect_references(
    req: Request,
    config: &TenantConfig,
) -> Result<(Request, Vec<TenantReference>), AppError> {
    let (mut parts, body) = req.into_parts();

    let mut references = path_references(&mut parts, config).await;
    references.extend(header_references(&parts.headers, config));
    references.extend(query_references(&parts.uri, config));

    let body = if is_json(&parts.headers) {
        let bytes = to_bytes(body, config.max_body_bytes)
            .await
            .map_err(|_| AppError::bad_request(BODY_UNREADABLE))?;
        references.extend(body_reference(&bytes, config));
        Body::from(bytes)
    } else {
        body
    };

    Ok((Request::from_parts(parts, body), references))
}

/// Tenant isolation middleware for `axum::middleware::from_fn_with_state`.
///
/// ```rust,ignore
/// let routes = Router::new()
///     .route("/clinics/{clinicId}/session", get(get_session))
///     .route_layer(middleware::from_fn_with_state(state.clone(), tenant_isolation))
///     .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));
/// ```
pub async fn tenant_isolation(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth = req
        .extensions()
        .get::<AuthContext>()
        .cloned()
        .ok_or_else(|| AppError::unauthorized(USER_CONTEXT_MISSING))?;

    let (mut req, references) = collect_references(req, &state.tenant_config).await?;
    let clinic_id = auth.tenant_id();

    if let Some(violation) = first_mismatch(clinic_id, &references) {
        warn!(
            user_id = %auth.principal.user_id,
            clinic_id = %clinic_id,
            source = %violation.source,
            "Cross-tenant access attempt blocked"
        );
        state.report(AuditEvent::TenantViolation {
            user_id: auth.principal.user_id.clone(),
            clinic_id: clinic_id.to_string(),
            source: violation.source,
            attempted: violation.value.clone().unwrap_or_default(),
            path: req.uri().path().to_string(),
        });
        return Err(AppError::forbidden(CROSS_TENANT_DENIED));
    }

    debug!(
        clinic_id = %clinic_id,
        references = references.len(),
        "Tenant context resolved"
    );

    req.extensions_mut().insert(TenantContext {
        clinic_id: clinic_id.clone(),
        overridden: false,
    });
    Ok(next.run(req).await)
}

/// Reject access to a loaded resource owned by a different clinic.
pub fn ensure_same_tenant(
    context: &TenantContext,
    resource_clinic_id: &str,
) -> Result<(), AppError> {
    if context.clinic_id == resource_clinic_id {
        Ok(())
    } else {
        Err(AppError::forbidden(CROSS_TENANT_DATA_DENIED))
    }
}

/// Extractor for the effective tenant. Requires [`tenant_isolation`] or
/// [`system_admin_tenant_override`](crate::middleware::tenant_override::system_admin_tenant_override)
/// on the route.
#[derive(Debug, Clone)]
pub struct Tenant(pub TenantContext);

impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .map(Tenant)
            .ok_or_else(|| AppError::unauthorized(TENANT_CONTEXT_MISSING))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;

    fn clinic(id: &str) -> ClinicId {
        ClinicId::new(id).unwrap()
    }

    fn request(uri: &str, headers: &[(&str, &str)], body: &'static str) -> Request {
        let mut builder = axum::http::Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::from(body)).unwrap()
    }

    async fn references(req: Request) -> Vec<TenantReference> {
        collect_references(req, &TenantConfig::default())
            .await
            .unwrap()
            .1
    }

    #[tokio::test]
    async fn test_no_references() {
        let refs = references(request("/api/session", &[], "")).await;
        assert!(refs.is_empty());
        assert!(first_mismatch(&clinic("clinic-A"), &refs).is_none());
    }

    #[tokio::test]
    async fn test_header_and_query_references() {
        let refs = references(request(
            "/api/tenant-context?clinicId=clinic-B&other=x",
            &[("x-clinic-id", "clinic-A")],
            "",
        ))
        .await;

        assert_eq!(
            refs,
            vec![
                TenantReference::new(TenantSource::Header, "clinic-A"),
                TenantReference::new(TenantSource::Query, "clinic-B"),
            ]
        );
        let mismatch = first_mismatch(&clinic("clinic-A"), &refs).unwrap();
        assert_eq!(mismatch.source, TenantSource::Query);
    }

    #[tokio::test]
    async fn test_json_body_reference_and_restore() {
        let body = r#"{"clinicId":"clinic-A","name":"Jane"}"#;
        let req = request("/", &[("content-type", "application/json")], body);

        let (req, refs) = collect_references(req, &TenantConfig::default())
            .await
            .unwrap();

        assert_eq!(refs, vec![TenantReference::new(TenantSource::Body, "clinic-A")]);
        let restored = req.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(restored, body.as_bytes());
    }

    #[tokio::test]
    async fn test_json_null_is_absent_and_number_never_matches() {
        let null = references(request(
            "/",
            &[("content-type", "application/json")],
            r#"{"clinicId":null}"#,
        ))
        .await;
        assert!(null.is_empty());

        let number = references(request(
            "/",
            &[("content-type", "application/json; charset=utf-8")],
            r#"{"clinicId":42}"#,
        ))
        .await;
        assert_eq!(number, vec![TenantReference::opaque(TenantSource::Body)]);
        assert!(!number[0].matches(&clinic("42")));
    }

    #[tokio::test]
    async fn test_string_null_is_an_ordinary_value() {
        let refs = references(request("/", &[("x-clinic-id", "null")], "")).await;

        assert_eq!(refs, vec![TenantReference::new(TenantSource::Header, "null")]);
        assert!(first_mismatch(&clinic("clinic-A"), &refs).is_some());
    }

    #[tokio::test]
    async fn test_non_json_body_is_not_inspected() {
        let refs = references(request(
            "/",
            &[("content-type", "text/plain")],
            r#"{"clinicId":"clinic-B"}"#,
        ))
        .await;
        assert!(refs.is_empty());

        let refs = references(request(
            "/",
            &[("content-type", "application/json")],
            "not json",
        ))
        .await;
        assert!(refs.is_empty());
    }

    #[tokio::test]
    async fn test_oversize_body_is_rejected() {
        let config = TenantConfig {
            max_body_bytes: 8,
            ..TenantConfig::default()
        };
        let req = request(
            "/",
            &[("content-type", "application/json")],
            r#"{"clinicId":"clinic-A"}"#,
        );

        let err = collect_references(req, &config).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), BODY_UNREADABLE);
    }

    #[test]
    fn test_vendor_json_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            "application/vnd.api+json".parse().unwrap(),
        );
        assert!(is_json(&headers));

        headers.insert(header::CONTENT_TYPE, "text/json".parse().unwrap());
        assert!(!is_json(&headers));
    }

    #[test]
    fn test_conflicting_sources_reject_even_when_one_matches() {
        let refs = vec![
            TenantReference::new(TenantSource::Path, "clinic-A"),
            TenantReference::new(TenantSource::Header, "clinic-B"),
        ];

        let mismatch = first_mismatch(&clinic("clinic-A"), &refs).unwrap();
        assert_eq!(mismatch.source, TenantSource::Header);
    }

    #[test]
    fn test_ensure_same_tenant() {
        let context = TenantContext {
            clinic_id: clinic("clinic-A"),
            overridden: false,
        };

        assert!(ensure_same_tenant(&context, "clinic-A").is_ok());
        let err = ensure_same_tenant(&context, "clinic-B").unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.public_message(), CROSS_TENANT_DATA_DENIED);
    }
}
