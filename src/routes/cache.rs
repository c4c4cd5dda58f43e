//! Cache management endpoint.
//!
//! DELETE /cache drops the cached locations and weather types so the next
//! read goes to IPMA.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct CacheMessage {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CacheClearedResponse {
    pub success: bool,
    pub data: CacheMessage,
}

/// Clear the service cache.
#[utoipa::path(
    delete,
    path = "/api/v1/cache",
    tag = "Cache",
    responses(
        (status = 200, description = "Cache cleared successfully", body = CacheClearedResponse),
    )
)]
pub async fn clear_cache(State(state): State<AppState>) -> Json<CacheClearedResponse> {
    state.forecasts.clear_cache();
    Json(CacheClearedResponse {
        success: true,
        data: CacheMessage {
            message: "Cache cleared successfully".to_string(),
        },
    })
}
