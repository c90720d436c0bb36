#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use http_body_util::BodyExt;
use medeez::router::init_router;
use medeez::state::AppState;
use medeez_auth::{Claims, Role, encode_claims};
use medeez_config::{CorsConfig, JwtConfig, RateLimitConfig, TenantConfig};
use medeez_observability::MemoryAuditSink;
use serde_json::Value;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-for-integration-tests-only";

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_token_expiry: 3600,
        issuer: None,
        audience: None,
        leeway: 0,
    }
}

pub struct TestApp {
    pub router: Router,
    pub audit: Arc<MemoryAuditSink>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_tenant_config(TenantConfig::default())
    }

    pub fn with_tenant_config(tenant_config: TenantConfig) -> Self {
        Self::build(tenant_config, None)
    }

    /// App whose callers may send `max_requests` requests per hour.
    pub fn with_rate_limit(max_requests: u32) -> Self {
        Self::build(
            TenantConfig::default(),
            Some(RateLimitConfig {
                enabled: true,
                max_requests,
                window_secs: 3600,
            }),
        )
    }

    fn build(tenant_config: TenantConfig, rate_limit: Option<RateLimitConfig>) -> Self {
        let audit = Arc::new(MemoryAuditSink::new());
        let mut state = AppState::new(
            jwt_config(),
            tenant_config,
            CorsConfig {
                allowed_origins: vec!["http://localhost:5173".to_string()],
            },
        )
        .with_audit_sink(audit.clone());
        if let Some(config) = rate_limit {
            state = state.with_rate_limit(&config);
        }

        Self {
            router: init_router(state),
            audit,
        }
    }

    /// Send a request and return the status and the JSON body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

/// Claims for a test principal.
#[derive(Clone)]
pub struct TestUser {
    pub claims: Claims,
}

impl TestUser {
    pub fn new(clinic_id: &str, role: Role) -> Self {
        let now = Utc::now().timestamp() as usize;
        Self {
            claims: Claims {
                sub: format!("test-user-{}", role),
                email: format!("{}@{}.test", role, clinic_id),
                clinic_id: clinic_id.to_string(),
                role,
                permissions: Vec::new(),
                is_active: true,
                iss: None,
                aud: None,
                exp: now + 3600,
                iat: now,
            },
        }
    }

    pub fn doctor(clinic_id: &str) -> Self {
        Self::new(clinic_id, Role::Doctor).with_permissions(&[
            "patients:read",
            "patients:write",
            "appointments:read",
            "notes:read",
        ])
    }

    pub fn admin(clinic_id: &str) -> Self {
        Self::new(clinic_id, Role::Admin).with_permissions(&["settings:read", "settings:write"])
    }

    pub fn system_admin() -> Self {
        Self::new("clinic-root", Role::SystemAdmin)
    }

    pub fn with_permissions(mut self, permissions: &[&str]) -> Self {
        self.claims.permissions = permissions.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.claims.is_active = false;
        self
    }

    pub fn expired(mut self) -> Self {
        let now = Utc::now().timestamp() as usize;
        self.claims.iat = now - 7200;
        self.claims.exp = now - 3600;
        self
    }

    pub fn token(&self) -> String {
        encode_claims(&self.claims, &jwt_config()).unwrap()
    }

    pub fn token_signed_with(&self, secret: &str) -> String {
        let config = JwtConfig {
            secret: secret.to_string(),
            ..jwt_config()
        };
        encode_claims(&self.claims, &config).unwrap()
    }
}

pub fn get(uri: &str, token: Option<&str>, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, token: &str, headers: &[(&str, &str)], body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Assert the standard error body shape and return its message.
pub fn error_message(body: &Value, kind: &str) -> String {
    assert_eq!(body["error"], kind);
    let timestamp = body["timestamp"].as_str().expect("timestamp missing");
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    body["message"].as_str().expect("message missing").to_string()
}
