//! Location and weather-type metadata endpoints.
//!
//! Both are served from the TTL cache.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use super::AppState;
use crate::errors::{AppError, ErrorResponse};
use crate::models::{Location, WeatherType};

/// Response type for GET /locations.
#[derive(Debug, Serialize, ToSchema)]
pub struct LocationsResponse {
    pub success: bool,
    pub data: Vec<Location>,
    /// Number of locations
    pub count: usize,
}

/// Response type for GET /weather-types.
#[derive(Debug, Serialize, ToSchema)]
pub struct WeatherTypesResponse {
    pub success: bool,
    pub data: Vec<WeatherType>,
}

/// List all Portuguese locations (district capitals and islands).
#[utoipa::path(
    get,
    path = "/api/v1/locations",
    tag = "Locations",
    responses(
        (status = 200, description = "List of all available locations", body = LocationsResponse),
        (status = 500, description = "IPMA unreachable", body = ErrorResponse),
    )
)]
pub async fn list_locations(
    State(state): State<AppState>,
) -> Result<Json<LocationsResponse>, AppError> {
    tracing::info!("Fetching all locations");
    let locations = state.forecasts.get_locations().await?;
    Ok(Json(LocationsResponse {
        success: true,
        count: locations.len(),
        data: locations.to_vec(),
    }))
}

/// List weather type classifications.
#[utoipa::path(
    get,
    path = "/api/v1/weather-types",
    tag = "Weather Types",
    responses(
        (status = 200, description = "List of weather type classifications", body = WeatherTypesResponse),
        (status = 500, description = "IPMA unreachable", body = ErrorResponse),
    )
)]
pub async fn list_weather_types(
    State(state): State<AppState>,
) -> Result<Json<WeatherTypesResponse>, AppError> {
    tracing::info!("Fetching weather types");
    let weather_types = state.forecasts.get_weather_types().await?;
    Ok(Json(WeatherTypesResponse {
        success: true,
        data: weather_types.to_vec(),
    }))
}
