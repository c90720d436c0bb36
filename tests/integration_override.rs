mod common;

use axum::http::StatusCode;
use common::{TestApp, TestUser, error_message, get, post_json};
use medeez_auth::Role;
use medeez_observability::AuditEvent;
use serde_json::json;

#[tokio::test]
async fn test_missing_target_header() {
    let app = TestApp::new();

    for user in [TestUser::system_admin(), TestUser::doctor("clinic-A")] {
        let (status, body) = app
            .send(get(
                "/api/admin/clinics/clinic-Z/session",
                Some(&user.token()),
                &[],
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            error_message(&body, "BAD_REQUEST"),
            "x-target-clinic-id header required for cross-tenant access"
        );
    }
}

#[tokio::test]
async fn test_non_system_admin_rejected() {
    let app = TestApp::new();

    for role in [Role::Staff, Role::Doctor, Role::Admin] {
        let token = TestUser::new("clinic-A", role).token();
        let (status, body) = app
            .send(get(
                "/api/admin/clinics/clinic-Z/session",
                Some(&token),
                &[("x-target-clinic-id", "clinic-Z")],
            ))
            .await;

        assert_eq!(status, StatusCode::FORBIDDEN, "{role}");
        assert_eq!(
            error_message(&body, "FORBIDDEN"),
            "Insufficient permissions for cross-tenant access"
        );
        assert!(!body.to_string().contains("clinic-Z"));
    }

    assert!(app.audit.events().iter().all(|e| matches!(
        e,
        AuditEvent::OverrideDenied { reason, .. }
            if reason == "Insufficient permissions for cross-tenant access"
    )));
}

#[tokio::test]
async fn test_system_admin_override() {
    let app = TestApp::new();
    let token = TestUser::system_admin().token();

    let (status, body) = app
        .send(get(
            "/api/admin/clinics/clinic-Z/session",
            Some(&token),
            &[("x-target-clinic-id", "clinic-Z")],
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clinicId"], "clinic-Z");
    assert_eq!(body["homeClinicId"], "clinic-root");
    assert_eq!(body["overridden"], true);

    let events = app.audit.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        AuditEvent::CrossTenantOverride { home_clinic_id, target_clinic_id, .. }
            if home_clinic_id == "clinic-root" && target_clinic_id == "clinic-Z"
    ));
}

#[tokio::test]
async fn test_override_without_other_references() {
    let app = TestApp::new();
    let token = TestUser::system_admin().token();

    let (status, body) = app
        .send(get(
            "/api/admin/tenant-context",
            Some(&token),
            &[("x-target-clinic-id", "target-clinic-id")],
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clinicId"], "target-clinic-id");
}

#[tokio::test]
async fn test_malformed_target_rejected() {
    let app = TestApp::new();
    let token = TestUser::system_admin().token();

    for target in ["clinic/../Z", "_clinic", "clinic Z"] {
        let (status, body) = app
            .send(get(
                "/api/admin/tenant-context",
                Some(&token),
                &[("x-target-clinic-id", target)],
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{target:?}");
        assert_eq!(
            error_message(&body, "BAD_REQUEST"),
            "Invalid target clinic identifier"
        );
    }
}

#[tokio::test]
async fn test_references_must_name_target() {
    let app = TestApp::new();
    let token = TestUser::system_admin().token();

    let (status, body) = app
        .send(get(
            "/api/admin/clinics/clinic-Y/session",
            Some(&token),
            &[("x-target-clinic-id", "clinic-Z")],
        ))
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        error_message(&body, "FORBIDDEN"),
        "Access denied: Cross-tenant access not allowed"
    );
    assert!(!body.to_string().contains("clinic-Y"));
}

#[tokio::test]
async fn test_override_post_body_reaches_handler() {
    let app = TestApp::new();
    let token = TestUser::system_admin().token();
    let payload = json!({ "clinicId": "clinic-Z", "reason": "support ticket" });

    let (status, body) = app
        .send(post_json(
            "/api/admin/clinics/clinic-Z/session",
            &token,
            &[("x-target-clinic-id", "clinic-Z")],
            &payload,
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overridden"], true);
    assert_eq!(body["body"], payload);
}

#[tokio::test]
async fn test_inactive_system_admin_rejected_before_override() {
    let app = TestApp::new();
    let token = TestUser::system_admin().inactive().token();

    let (status, body) = app
        .send(get(
            "/api/admin/clinics/clinic-Z/session",
            Some(&token),
            &[("x-target-clinic-id", "clinic-Z")],
        ))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        error_message(&body, "UNAUTHORIZED"),
        "User account is inactive"
    );
}
