pub mod cache;
pub mod forecasts;
pub mod health;
pub mod locations;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Json;

use crate::errors::ErrorResponse;
use crate::services::forecast::ForecastService;

/// Shared application state for all endpoints.
#[derive(Clone)]
pub struct AppState {
    pub forecasts: Arc<ForecastService>,
}

/// JSON 404 for paths no route matches.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Endpoint not found")),
    )
}
