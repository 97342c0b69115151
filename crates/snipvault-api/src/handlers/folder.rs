//! Folder CRUD handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use snipvault_core::types::FolderId;
use snipvault_entity::folder::Folder;

use crate::dto::request::{CreateFolderRequest, DeleteFolderQuery, UpdateFolderRequest};
use crate::dto::response::{ApiResponse, CountResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/folders
pub async fn list_folders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Folder>>>, ApiError> {
    let folders = state.folder_service.list_folders(&auth).await?;
    Ok(Json(ApiResponse::ok(folders)))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Folder>>), ApiError> {
    let folder = state.folder_service.create_folder(&auth, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder))))
}

/// PUT /api/folders/{id}
pub async fn update_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FolderId>,
    ValidatedJson(req): ValidatedJson<UpdateFolderRequest>,
) -> Result<Json<ApiResponse<Folder>>, ApiError> {
    let folder = state
        .folder_service
        .update_folder(&auth, id, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(folder)))
}

/// DELETE /api/folders/{id}?move_snippets_to_root=bool
pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<FolderId>,
    Query(query): Query<DeleteFolderQuery>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state
        .folder_service
        .delete_folder(&auth, id, query.move_snippets_to_root)
        .await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}

/// POST /api/folders/reconcile
pub async fn reconcile_counts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.folder_service.reconcile_counts(&auth).await?;
    Ok(Json(ApiResponse::ok(CountResponse { count })))
}
