//! Domain types for IPMA open data.
//!
//! Field names serialize in the camelCase form the API has always exposed.
//! Deserialization additionally accepts the spellings used by the live
//! upstream files (`idRegiao`, `idAreaAviso`, `descWeatherTypePT`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::helpers::{
    f64_from_number_or_string, i64_from_number_or_string, string_from_string_or_number,
};

/// A forecast location (district capital or island).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Region identifier
    #[serde(alias = "idRegiao", deserialize_with = "i64_from_number_or_string")]
    pub region_id: i64,
    /// Warning area code (e.g. "AVR")
    #[serde(alias = "idAreaAviso", deserialize_with = "string_from_string_or_number")]
    pub id_warning: String,
    /// Municipality identifier
    #[serde(alias = "idConcelho", deserialize_with = "i64_from_number_or_string")]
    pub id_municipio: i64,
    /// Global location identifier, shared with forecast records
    #[serde(deserialize_with = "i64_from_number_or_string")]
    #[schema(example = 1010500)]
    pub global_id_local: i64,
    /// Latitude (WGS84)
    #[serde(deserialize_with = "f64_from_number_or_string")]
    pub latitude: f64,
    /// Longitude (WGS84)
    #[serde(deserialize_with = "f64_from_number_or_string")]
    pub longitude: f64,
    /// District identifier
    #[serde(deserialize_with = "i64_from_number_or_string")]
    pub id_distrito: i64,
    /// Display name
    #[schema(example = "Aveiro")]
    pub local: String,
    /// District name, when IPMA provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dico: Option<String>,
}

/// Weather type classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeatherType {
    #[serde(
        rename = "idWeatherType",
        deserialize_with = "i64_from_number_or_string"
    )]
    pub id_weather_type: i64,
    /// Portuguese description
    #[serde(rename = "descIdWeatherTypePT", alias = "descWeatherTypePT")]
    pub desc_pt: String,
    /// English description
    #[serde(rename = "descIdWeatherTypeEN", alias = "descWeatherTypeEN")]
    pub desc_en: String,
}

/// One day's forecast for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRecord {
    /// Precipitation probability (0-100)
    #[serde(deserialize_with = "f64_from_number_or_string")]
    pub precipita_prob: f64,
    /// Minimum temperature in Celsius
    #[serde(deserialize_with = "f64_from_number_or_string")]
    pub t_min: f64,
    /// Maximum temperature in Celsius
    #[serde(deserialize_with = "f64_from_number_or_string")]
    pub t_max: f64,
    /// Predominant wind direction (e.g. "NW")
    pub pred_wind_dir: String,
    /// Weather type identifier
    #[serde(deserialize_with = "i64_from_number_or_string")]
    pub id_weather_type: i64,
    /// Wind speed class
    #[serde(deserialize_with = "i64_from_number_or_string")]
    pub class_wind_speed: i64,
    #[serde(deserialize_with = "f64_from_number_or_string")]
    pub longitude: f64,
    #[serde(deserialize_with = "f64_from_number_or_string")]
    pub latitude: f64,
    /// Global location identifier
    #[serde(deserialize_with = "i64_from_number_or_string")]
    pub global_id_local: i64,
}

/// A forecast record joined with its location's name and district.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedForecastRecord {
    #[serde(flatten)]
    pub forecast: ForecastRecord,
    /// Location display name, or "Unknown" when the id has no location
    #[schema(example = "Porto")]
    pub location_name: String,
    /// District name, null when unknown
    pub district: Option<String>,
}

/// A full daily forecast file as published upstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastBatch {
    pub owner: String,
    pub country: String,
    pub forecast_date: String,
    pub data_update: String,
    pub data: Vec<ForecastRecord>,
}

/// Header fields of a forecast batch.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastMetadata {
    /// Date the forecast is for
    #[schema(example = "2026-10-19")]
    pub forecast_date: String,
    /// When IPMA last updated the forecast
    pub data_update: String,
    #[schema(example = "IPMA")]
    pub owner: String,
    #[schema(example = "PT")]
    pub country: String,
}

impl From<&ForecastBatch> for ForecastMetadata {
    fn from(b: &ForecastBatch) -> Self {
        Self {
            forecast_date: b.forecast_date.clone(),
            data_update: b.data_update.clone(),
            owner: b.owner.clone(),
            country: b.country.clone(),
        }
    }
}

/// Forecast day index relative to today. Only 0, 1 and 2 are published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForecastDay(u8);

impl ForecastDay {
    pub const MAX: u8 = 2;
    pub const TODAY: ForecastDay = ForecastDay(0);

    pub fn index(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for ForecastDay {
    type Error = AppError;

    fn try_from(day: i64) -> Result<Self, Self::Error> {
        if (0..=Self::MAX as i64).contains(&day) {
            Ok(ForecastDay(day as u8))
        } else {
            Err(AppError::BadRequest(
                "Day parameter must be between 0 and 2".to_string(),
            ))
        }
    }
}

impl fmt::Display for ForecastDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
