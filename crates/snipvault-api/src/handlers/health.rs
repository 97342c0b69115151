//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use snipvault_core::error::AppError;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/health
pub async fn health(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<HealthResponse>>, ApiError> {
    let healthy = match state.store.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            warn!(error = %e, "Store health check failed");
            false
        }
    };
    if !healthy {
        return Err(AppError::service_unavailable("Document store is unavailable").into());
    }

    Ok(Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.store.provider_type().to_string(),
    })))
}
