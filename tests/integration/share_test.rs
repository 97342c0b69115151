//! Integration tests for share link create, resolve, and revoke.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_share_link_round_trip() {
    let app = helpers::TestApp::new();
    let token = app.token("alice");
    let created = app.create_snippet(&token, json!({ "content": "x = 1" })).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .request(
            "POST",
            &format!("/api/snippets/{id}/share"),
            Some(json!({ "ttl_hours": 1 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    let path = response.data()["path"].as_str().unwrap().to_string();
    let link_id = response.data()["id"].as_str().unwrap().to_string();

    let resolved = app.request("GET", &path, None, None).await;
    assert_eq!(resolved.status, StatusCode::OK);
    assert_eq!(resolved.data()["content"], "x = 1");

    let revoked = app
        .request("DELETE", &format!("/api/shares/{link_id}"), None, Some(&token))
        .await;
    assert_eq!(revoked.status, StatusCode::OK);

    let resolved = app.request("GET", &path, None, None).await;
    assert_eq!(resolved.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_ttl_rejected() {
    let app = helpers::TestApp::new();
    let token = app.token("alice");
    let created = app.create_snippet(&token, json!({ "content": "x = 1" })).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .request(
            "POST",
            &format!("/api/snippets/{id}/share"),
            Some(json!({ "ttl_hours": 0 })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_token_is_not_found() {
    let app = helpers::TestApp::new();

    let response = app.request("GET", "/api/s/does-not-exist", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}
