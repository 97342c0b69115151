//! Integration tests for the snippet lifecycle over HTTP.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_create_and_get_snippet() {
    let app = helpers::TestApp::new();
    let token = app.token("alice");

    let created = app
        .create_snippet(
            &token,
            json!({ "title": "hello", "content": "fn main() { println!(\"hi\"); }" }),
        )
        .await;
    assert_eq!(created["current_version"], 1);
    assert_eq!(created["language"], "rust");
    assert_eq!(created["edit_history"].as_array().unwrap().len(), 1);

    let id = created["id"].as_str().unwrap();
    let response = app
        .request("GET", &format!("/api/snippets/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.data()["title"], "hello");
}

#[tokio::test]
async fn test_create_without_content_is_bad_request() {
    let app = helpers::TestApp::new();
    let token = app.token("alice");

    let response = app
        .request("POST", "/api/snippets", Some(json!({ "title": "x" })), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_other_owner_sees_not_found() {
    let app = helpers::TestApp::new();
    let alice = app.token("alice");
    let bob = app.token("bob");
    let created = app.create_snippet(&alice, json!({ "content": "x = 1" })).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .request("GET", &format!("/api/snippets/{id}"), None, Some(&bob))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_merge_conflict_returns_409_with_versions() {
    let app = helpers::TestApp::new();
    let token = app.token("alice");
    let created = app.create_snippet(&token, json!({ "content": "x = 1" })).await;
    let path = format!("/api/snippets/{}", created["id"].as_str().unwrap());

    let first = app
        .request(
            "PUT",
            &path,
            Some(json!({ "content": "x = 2", "expected_version": 1, "conflict_mode": "merge" })),
            Some(&token),
        )
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.data()["snippet"]["current_version"], 2);
    assert!(first.data()["conflict"].is_null());

    let stale = app
        .request(
            "PUT",
            &path,
            Some(json!({ "content": "x = 3", "expected_version": 1, "conflict_mode": "merge" })),
            Some(&token),
        )
        .await;
    assert_eq!(stale.status, StatusCode::CONFLICT);
    assert_eq!(stale.body["error"], "CONFLICT");
    assert_eq!(stale.body["details"]["expected_version"], 1);
    assert_eq!(stale.body["details"]["current_version"], 2);

    let current = app.request("GET", &path, None, Some(&token)).await;
    assert_eq!(current.data()["content"], "x = 2");
}

#[tokio::test]
async fn test_overwrite_reports_conflict_but_succeeds() {
    let app = helpers::TestApp::new();
    let token = app.token("alice");
    let created = app.create_snippet(&token, json!({ "content": "x = 1" })).await;
    let path = format!("/api/snippets/{}", created["id"].as_str().unwrap());
    app.request("PUT", &path, Some(json!({ "content": "x = 2" })), Some(&token))
        .await;

    let response = app
        .request(
            "PUT",
            &path,
            Some(json!({ "content": "x = 3", "expected_version": 1 })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["snippet"]["current_version"], 3);
    assert_eq!(response.data()["conflict"]["server_version"], 2);
    assert_eq!(response.data()["conflict"]["conflict_mode"], "overwrite");
}

#[tokio::test]
async fn test_trash_lifecycle() {
    let app = helpers::TestApp::new();
    let token = app.token("alice");
    let created = app.create_snippet(&token, json!({ "content": "x = 1" })).await;
    let id = created["id"].as_str().unwrap();

    let response = app
        .request("DELETE", &format!("/api/snippets/{id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let listed = app.request("GET", "/api/snippets", None, Some(&token)).await;
    assert!(listed.data().as_array().unwrap().is_empty());

    let trash = app.request("GET", "/api/trash", None, Some(&token)).await;
    let items = trash.data().as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["folder_name"], "Root");
    assert_eq!(items[0]["id"], id);

    let restored = app
        .request("POST", &format!("/api/snippets/{id}/restore"), None, Some(&token))
        .await;
    assert_eq!(restored.status, StatusCode::OK);
    assert_eq!(restored.data()["is_deleted"], false);

    let purged = app
        .request("DELETE", &format!("/api/trash/{id}"), None, Some(&token))
        .await;
    assert_eq!(purged.status, StatusCode::OK);

    let gone = app
        .request("GET", &format!("/api/snippets/{id}"), None, Some(&token))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_by_folder_scope() {
    let app = helpers::TestApp::new();
    let token = app.token("alice");
    let folder_id = app.create_folder(&token, "work").await;
    app.create_snippet(&token, json!({ "content": "x = 1", "folder_id": folder_id }))
        .await;
    app.create_snippet(&token, json!({ "content": "y = 2" })).await;

    let root = app
        .request("GET", "/api/snippets?folder_id=root", None, Some(&token))
        .await;
    assert_eq!(root.data().as_array().unwrap().len(), 1);

    let scoped = app
        .request(
            "GET",
            &format!("/api/snippets?folder_id={folder_id}"),
            None,
            Some(&token),
        )
        .await;
    let items = scoped.data().as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["folder_id"], folder_id.as_str());

    let bad = app
        .request("GET", "/api/snippets?folder_id=nope", None, Some(&token))
        .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
}
