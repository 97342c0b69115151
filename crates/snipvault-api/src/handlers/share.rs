//! Share link handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use snipvault_core::types::{ShareLinkId, SnippetId};
use snipvault_entity::snippet::Snippet;

use crate::dto::request::CreateShareLinkRequest;
use crate::dto::response::{ApiResponse, MessageResponse, ShareLinkResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/snippets/{id}/share
pub async fn create_share_link(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<SnippetId>,
    ValidatedJson(req): ValidatedJson<CreateShareLinkRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ShareLinkResponse>>), ApiError> {
    let link = state
        .share_service
        .create_link(&auth, id, req.ttl_hours)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(link.into()))))
}

/// DELETE /api/shares/{id}
pub async fn revoke_share_link(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ShareLinkId>,
) -> Result<Json<ApiResponse<MessageResponse>>, ApiError> {
    state.share_service.revoke_link(&auth, id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Share link revoked",
    ))))
}

/// GET /api/s/{token} (public)
pub async fn resolve_share_link(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<Snippet>>, ApiError> {
    let snippet = state.share_service.resolve_link(&token).await?;
    Ok(Json(ApiResponse::ok(snippet)))
}
