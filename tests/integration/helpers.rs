//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use snipvault_api::{AppState, build_app};
use snipvault_auth::JwtEncoder;
use snipvault_core::config::AppConfig;
use snipvault_core::types::OwnerId;
use snipvault_database::MemoryDocumentStore;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
}

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body (`Null` when empty)
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

impl TestApp {
    /// Create a new test application on a fresh in-memory store
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with a custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::new(config.clone(), Arc::new(MemoryDocumentStore::new()))
            .expect("Failed to build state");
        Self {
            router: build_app(state),
            config,
        }
    }

    /// Issue a bearer token for `owner`
    pub fn token(&self, owner: &str) -> String {
        JwtEncoder::new(&self.config.auth)
            .generate_access_token(&OwnerId::new(owner))
            .expect("Failed to issue token")
            .0
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    /// Create a snippet and return its JSON
    pub async fn create_snippet(&self, token: &str, body: Value) -> Value {
        let response = self.request("POST", "/api/snippets", Some(body), Some(token)).await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create snippet failed: {:?}",
            response.body
        );
        response.data().clone()
    }

    /// Create a folder and return its id
    pub async fn create_folder(&self, token: &str, name: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/folders",
                Some(serde_json::json!({ "name": name })),
                Some(token),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Create folder failed: {:?}",
            response.body
        );
        response.data()["id"]
            .as_str()
            .expect("folder id")
            .to_string()
    }
}
