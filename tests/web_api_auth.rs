//! Web API Session Tests
//!
//! Integration tests for session resolution, sign-out and the public
//! endpoints.

mod common;

use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::StatusCode;
use serde_json::Value;

use caixa_preta::auth::{encode_session_token, Identity, SessionClaims};
use common::{create_test_app, token_for, token_for_identity, JWT_SECRET};

// ============================================================================
// Me Tests
// ============================================================================

#[tokio::test]
async fn test_me_with_bearer_token() {
    let app = create_test_app().await;
    let token = token_for_identity(
        &Identity::new("u1")
            .with_email("u1@example.com")
            .with_name("User One"),
    );

    let response = app
        .server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], "u1");
    assert_eq!(body["email"], "u1@example.com");
    assert_eq!(body["name"], "User One");
}

#[tokio::test]
async fn test_me_with_session_cookie() {
    let app = create_test_app().await;

    let response = app
        .server
        .get("/api/auth/me")
        .add_header(COOKIE, format!("caixa_session={}", token_for("u2")))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], "u2");
    assert!(body["email"].is_null());
}

#[tokio::test]
async fn test_me_without_session() {
    let app = create_test_app().await;

    let response = app.server.get("/api/auth/me").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_expired_token() {
    let app = create_test_app().await;
    let now = chrono::Utc::now().timestamp() as u64;
    let claims = SessionClaims {
        sub: "u1".to_string(),
        email: None,
        name: None,
        iat: now - 7200,
        exp: now - 3600,
    };
    let token = encode_session_token(JWT_SECRET, &claims).unwrap();

    let response = app
        .server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_foreign_secret() {
    let app = create_test_app().await;
    let token = encode_session_token(
        "some-other-secret",
        &SessionClaims::for_identity(&Identity::new("u1"), 3600),
    )
    .unwrap();

    let response = app
        .server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, format!("Bearer {}", token))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Logout Tests
// ============================================================================

#[tokio::test]
async fn test_logout_clears_session_cookie() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/auth/logout")
        .add_header(COOKIE, format!("caixa_session={}", token_for("u1")))
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
    let set_cookie = response.header(SET_COOKIE);
    let set_cookie = set_cookie.to_str().unwrap();
    assert!(set_cookie.starts_with("caixa_session="));
    assert!(set_cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_logout_without_session() {
    let app = create_test_app().await;

    let response = app.server.post("/api/auth/logout").await;

    response.assert_status(StatusCode::NO_CONTENT);
}

// ============================================================================
// Public Endpoints
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = create_test_app().await;

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_openapi_document() {
    let app = create_test_app().await;

    let response = app.server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["paths"]["/api/upload"].is_object());
    assert!(body["paths"]["/api/files/{id}/download"].is_object());
}

#[tokio::test]
async fn test_health_ignores_bad_token() {
    let app = create_test_app().await;

    let response = app
        .server
        .get("/health")
        .add_header(AUTHORIZATION, "Bearer garbage")
        .await;

    response.assert_status_ok();
}
