//! Integration tests for bearer token handling.

mod helpers;

use axum::http::StatusCode;
use chrono::Duration;
use snipvault_auth::JwtEncoder;
use snipvault_core::types::OwnerId;

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/snippets", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_garbage_and_expired_tokens_rejected() {
    let app = helpers::TestApp::new();

    let response = app
        .request("GET", "/api/folders", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let expired = JwtEncoder::new(&app.config.auth)
        .generate_with_ttl(&OwnerId::new("alice"), Duration::minutes(-10))
        .unwrap()
        .0;
    let response = app.request("GET", "/api/folders", None, Some(&expired)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["store"], "memory");
}
