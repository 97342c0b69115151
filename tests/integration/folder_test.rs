//! Integration tests for folders and counters over HTTP.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_folder_count_tracks_snippets() {
    let app = helpers::TestApp::new();
    let token = app.token("alice");
    let folder_id = app.create_folder(&token, "work").await;
    app.create_snippet(&token, json!({ "content": "x = 1", "folder_id": folder_id }))
        .await;

    let response = app.request("GET", "/api/folders", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    let folders = response.data().as_array().unwrap();
    assert_eq!(folders.len(), 1);
    assert_eq!(folders[0]["snippet_count"], 1);
    assert_eq!(folders[0]["color"], "#6366f1");
}

#[tokio::test]
async fn test_create_folder_with_blank_name_rejected() {
    let app = helpers::TestApp::new();
    let token = app.token("alice");

    let response = app
        .request("POST", "/api/folders", Some(json!({ "name": "" })), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_snippet_into_unknown_folder_rejected() {
    let app = helpers::TestApp::new();
    let token = app.token("alice");

    let response = app
        .request(
            "POST",
            "/api/snippets",
            Some(json!({ "content": "x = 1", "folder_id": "00000000-0000-0000-0000-000000000001" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_folder() {
    let app = helpers::TestApp::new();
    let token = app.token("alice");
    let folder_id = app.create_folder(&token, "work").await;

    let response = app
        .request(
            "PUT",
            &format!("/api/folders/{folder_id}"),
            Some(json!({ "name": "play" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["name"], "play");
}

#[tokio::test]
async fn test_delete_folder_moves_or_trashes() {
    let app = helpers::TestApp::new();
    let token = app.token("alice");

    let keep = app.create_folder(&token, "keep").await;
    let drop = app.create_folder(&token, "drop").await;
    for i in 0..3 {
        app.create_snippet(&token, json!({ "content": format!("x = {i}"), "folder_id": keep }))
            .await;
        app.create_snippet(&token, json!({ "content": format!("y = {i}"), "folder_id": drop }))
            .await;
    }

    let moved = app
        .request(
            "DELETE",
            &format!("/api/folders/{keep}?move_snippets_to_root=true"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK);
    assert_eq!(moved.data()["count"], 3);

    let trashed = app
        .request("DELETE", &format!("/api/folders/{drop}"), None, Some(&token))
        .await;
    assert_eq!(trashed.data()["count"], 3);

    let root = app
        .request("GET", "/api/snippets?folder_id=root", None, Some(&token))
        .await;
    assert_eq!(root.data().as_array().unwrap().len(), 3);

    let trash = app.request("GET", "/api/trash", None, Some(&token)).await;
    let items = trash.data().as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|i| i["folder_name"] == "drop"));

    let folders = app.request("GET", "/api/folders", None, Some(&token)).await;
    assert!(folders.data().as_array().unwrap().is_empty());

    let again = app
        .request("DELETE", &format!("/api/folders/{keep}"), None, Some(&token))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reconcile_on_consistent_store_is_noop() {
    let app = helpers::TestApp::new();
    let token = app.token("alice");
    let folder_id = app.create_folder(&token, "work").await;
    app.create_snippet(&token, json!({ "content": "x = 1", "folder_id": folder_id }))
        .await;

    let response = app
        .request("POST", "/api/folders/reconcile", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["count"], 0);
}
