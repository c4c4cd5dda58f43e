use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Standard error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false` for errors
    pub success: bool,
    /// Human-readable error message
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to fetch data from IPMA API: {endpoint} ({reason})")]
    UpstreamFailure { endpoint: String, reason: String },

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamFailure { .. } | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::BadRequest(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::UpstreamFailure { endpoint, reason } => {
                tracing::error!("Upstream failure for {}: {}", endpoint, reason);
                "Failed to fetch data from IPMA API".to_string()
            }
            AppError::InternalError(detail) => {
                tracing::error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
        };

        (self.status(), axum::Json(ErrorResponse::new(message))).into_response()
    }
}
