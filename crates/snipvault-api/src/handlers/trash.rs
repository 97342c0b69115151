//! Trash listing and permanent deletion.

use axum::Json;
use axum::extract::{Path, State};

use snipvault_core::types::SnippetId;
use snipvault_entity::snippet::TrashedSnippet;

use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/trash
pub async fn list_trash(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<TrashedSnippet>>>, ApiError> {
    let items = state.snippet_service.list_trash(&auth).await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// DELETE /api/trash/{id}
pub async fn purge_snippet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<SnippetId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.snippet_service.purge_snippet(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Snippet permanently deleted",
    ))))
}
