//! Forecast HTTP endpoints.
//!
//! - GET /forecast/current?day=N&location=ID
//! - GET /forecast/daily?day=N&location=ID (alias)
//! - GET /forecast/daily/:location_id?day=N

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::AppState;
use crate::errors::{AppError, ErrorResponse};
use crate::models::{EnhancedForecastRecord, ForecastDay, ForecastMetadata};
use crate::services::forecast::LocationForecast;

// ---------------------------------------------------------------------------
// Query parameter structs
// ---------------------------------------------------------------------------

// Parameters are taken as raw strings so bad values produce our own 400
// envelope rather than axum's plain-text rejection. Extractor rejections
// (malformed or duplicated query strings) are mapped the same way.

#[derive(Debug, Deserialize, IntoParams)]
pub struct ForecastQuery {
    /// Forecast day: 0 (today), 1 or 2. Defaults to 0.
    pub day: Option<String>,
    /// Restrict the result to one global location id
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DayQuery {
    /// Forecast day: 0 (today), 1 or 2. Defaults to 0.
    pub day: Option<String>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Forecast for all locations.
#[derive(Debug, Serialize, ToSchema)]
pub struct ForecastListResponse {
    pub success: bool,
    pub metadata: ForecastMetadata,
    pub data: Vec<EnhancedForecastRecord>,
    /// Number of forecast records
    pub count: usize,
}

/// Forecast for a single location.
#[derive(Debug, Serialize, ToSchema)]
pub struct LocationForecastResponse {
    pub success: bool,
    pub metadata: ForecastMetadata,
    pub data: EnhancedForecastRecord,
    /// Always 1
    pub count: usize,
}

impl From<LocationForecast> for LocationForecastResponse {
    fn from(f: LocationForecast) -> Self {
        Self {
            success: true,
            metadata: f.metadata,
            data: f.data,
            count: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Parameter validation
// ---------------------------------------------------------------------------

/// Parse the `day` query parameter. Absent or blank means today.
fn parse_day(raw: Option<&str>) -> Result<ForecastDay, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(ForecastDay::TODAY),
        Some(s) => {
            let day: i64 = s.parse().map_err(|_| {
                AppError::BadRequest("Day parameter must be between 0 and 2".to_string())
            })?;
            ForecastDay::try_from(day)
        }
    }
}

fn parse_positive_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

/// Parse the optional `location` query parameter. Blank means absent.
fn parse_location_query(raw: Option<&str>) -> Result<Option<i64>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_positive_id(s).map(Some).ok_or_else(|| {
            AppError::BadRequest("Location parameter must be a positive integer".to_string())
        }),
    }
}

fn parse_location_path(raw: &str) -> Result<i64, AppError> {
    parse_positive_id(raw).ok_or_else(|| {
        AppError::BadRequest("Invalid location ID. Must be a positive integer.".to_string())
    })
}

fn location_not_found() -> AppError {
    AppError::NotFound("Location not found".to_string())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Get the forecast for all locations, enriched with names and districts.
///
/// With `location`, returns only that location's record (404 if absent).
/// Served at both `/forecast/current` and `/forecast/daily`.
#[utoipa::path(
    get,
    path = "/api/v1/forecast/current",
    tag = "Forecasts",
    params(ForecastQuery),
    responses(
        (status = 200, description = "Forecast data for all Portuguese locations", body = ForecastListResponse),
        (status = 400, description = "Invalid day or location parameter", body = ErrorResponse),
        (status = 404, description = "Location not found", body = ErrorResponse),
        (status = 500, description = "IPMA unreachable", body = ErrorResponse),
    )
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    params: Result<Query<ForecastQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(params) = params.map_err(query_rejected)?;
    let day = parse_day(params.day.as_deref())?;
    let location_id = parse_location_query(params.location.as_deref())?;

    match location_id {
        Some(id) => {
            tracing::info!("Fetching day {} forecast for location {}", day, id);
            let forecast = state
                .forecasts
                .get_forecast_by_location(id, day)
                .await?
                .ok_or_else(location_not_found)?;
            Ok(Json(LocationForecastResponse::from(forecast)).into_response())
        }
        None => {
            tracing::info!("Fetching day {} forecast for all locations", day);
            let enhanced = state.forecasts.get_enhanced_forecast_by_day(day).await?;
            Ok(Json(ForecastListResponse {
                success: true,
                metadata: enhanced.metadata,
                count: enhanced.data.len(),
                data: enhanced.data,
            })
            .into_response())
        }
    }
}

/// Get the forecast for a single location.
#[utoipa::path(
    get,
    path = "/api/v1/forecast/daily/{locationId}",
    tag = "Forecasts",
    params(
        ("locationId" = i64, Path, description = "Global location id (globalIdLocal)"),
        DayQuery,
    ),
    responses(
        (status = 200, description = "Forecast for the location", body = LocationForecastResponse),
        (status = 400, description = "Invalid location id or day", body = ErrorResponse),
        (status = 404, description = "Location not found", body = ErrorResponse),
        (status = 500, description = "IPMA unreachable", body = ErrorResponse),
    )
)]
pub async fn get_location_forecast(
    State(state): State<AppState>,
    location_id: Result<Path<String>, PathRejection>,
    params: Result<Query<DayQuery>, QueryRejection>,
) -> Result<Json<LocationForecastResponse>, AppError> {
    let Path(location_id) = location_id.map_err(|rejection| {
        tracing::debug!("Rejected location path: {}", rejection.body_text());
        AppError::BadRequest("Invalid location ID. Must be a positive integer.".to_string())
    })?;
    let Query(params) = params.map_err(query_rejected)?;
    let location_id = parse_location_path(&location_id)?;
    let day = parse_day(params.day.as_deref())?;

    tracing::info!("Fetching day {} forecast for location {}", day, location_id);
    let forecast = state
        .forecasts
        .get_forecast_by_location(location_id, day)
        .await?
        .ok_or_else(location_not_found)?;

    Ok(Json(LocationForecastResponse::from(forecast)))
}

fn query_rejected(rejection: QueryRejection) -> AppError {
    AppError::BadRequest(rejection.body_text())
}
