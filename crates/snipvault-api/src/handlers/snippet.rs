//! Snippet CRUD and lifecycle handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use snipvault_core::types::SnippetId;
use snipvault_entity::snippet::Snippet;
use snipvault_service::{SnippetUpdate, UpdateOutcome};

use crate::dto::request::{CreateSnippetRequest, ListSnippetsQuery};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::{ApiJson, AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/snippets
pub async fn create_snippet(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateSnippetRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Snippet>>), ApiError> {
    let snippet = state
        .snippet_service
        .create_snippet(&auth, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(snippet))))
}

/// GET /api/snippets?folder_id=<uuid|root>
pub async fn list_snippets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListSnippetsQuery>,
) -> Result<Json<ApiResponse<Vec<Snippet>>>, ApiError> {
    let scope = query.scope()?;
    let snippets = state.snippet_service.list_snippets(&auth, scope).await?;
    Ok(Json(ApiResponse::ok(snippets)))
}

/// GET /api/snippets/{id}
pub async fn get_snippet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<SnippetId>,
) -> Result<Json<ApiResponse<Snippet>>, ApiError> {
    let snippet = state.snippet_service.get_snippet(&auth, id).await?;
    Ok(Json(ApiResponse::ok(snippet)))
}

/// PUT /api/snippets/{id}
pub async fn update_snippet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<SnippetId>,
    ApiJson(update): ApiJson<SnippetUpdate>,
) -> Result<Json<ApiResponse<UpdateOutcome>>, ApiError> {
    let outcome = state
        .snippet_service
        .update_snippet(&auth, id, update)
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// DELETE /api/snippets/{id}
pub async fn delete_snippet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<SnippetId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.snippet_service.delete_snippet(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Snippet moved to trash",
    ))))
}

/// POST /api/snippets/{id}/restore
pub async fn restore_snippet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<SnippetId>,
) -> Result<Json<ApiResponse<Snippet>>, ApiError> {
    let snippet = state.snippet_service.restore_snippet(&auth, id).await?;
    Ok(Json(ApiResponse::ok(snippet)))
}
