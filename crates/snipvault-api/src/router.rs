//! Route definitions for the SnipVault HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState` and
//! passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the API router with body limits and request logging.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    let api_routes = Router::new()
        .merge(snippet_routes())
        .merge(trash_routes())
        .merge(folder_routes())
        .merge(share_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Snippet CRUD and lifecycle
fn snippet_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/snippets",
            get(handlers::snippet::list_snippets).post(handlers::snippet::create_snippet),
        )
        .route(
            "/snippets/{id}",
            get(handlers::snippet::get_snippet)
                .put(handlers::snippet::update_snippet)
                .delete(handlers::snippet::delete_snippet),
        )
        .route(
            "/snippets/{id}/restore",
            post(handlers::snippet::restore_snippet),
        )
        .route(
            "/snippets/{id}/share",
            post(handlers::share::create_share_link),
        )
}

/// Trash listing and purge
fn trash_routes() -> Router<AppState> {
    Router::new()
        .route("/trash", get(handlers::trash::list_trash))
        .route("/trash/{id}", delete(handlers::trash::purge_snippet))
}

/// Folder CRUD and counter maintenance
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders",
            get(handlers::folder::list_folders).post(handlers::folder::create_folder),
        )
        .route(
            "/folders/reconcile",
            post(handlers::folder::reconcile_counts),
        )
        .route(
            "/folders/{id}",
            put(handlers::folder::update_folder)
                .delete(handlers::folder::delete_folder),
        )
}

/// Share link management and public resolution
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/shares/{id}", delete(handlers::share::revoke_share_link))
        .route("/s/{token}", get(handlers::share::resolve_share_link))
}

/// Liveness
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
