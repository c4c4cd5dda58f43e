//! Forecast retrieval and enrichment.
//!
//! Locations and weather types change rarely and are served from TTL slots.
//! Forecast files are always fetched live so `forecastDate`/`dataUpdate`
//! reflect the latest IPMA run; they are then joined with the (cached)
//! locations list to attach a display name and district to every record.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::AppError;
use crate::models::{
    EnhancedForecastRecord, ForecastBatch, ForecastDay, ForecastMetadata, Location, WeatherType,
};
use crate::services::cache::{Clock, TtlSlot};
use crate::services::ipma::IpmaClient;

/// Display name used when a forecast record has no matching location.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// An enriched forecast file.
#[derive(Debug, Clone)]
pub struct EnhancedForecast {
    pub metadata: ForecastMetadata,
    pub data: Vec<EnhancedForecastRecord>,
}

/// The forecast for a single location, with the metadata of its batch.
#[derive(Debug, Clone)]
pub struct LocationForecast {
    pub metadata: ForecastMetadata,
    pub data: EnhancedForecastRecord,
}

/// Join forecast records with location metadata on `globalIdLocal`.
///
/// Left outer join: every input record appears in the output, in order.
/// Unmatched records get `locationName = "Unknown"` and `district = None`.
/// When several locations share an id, the first one wins.
pub fn enrich(batch: &ForecastBatch, locations: &[Location]) -> Vec<EnhancedForecastRecord> {
    let mut by_id: HashMap<i64, &Location> = HashMap::with_capacity(locations.len());
    for loc in locations {
        by_id.entry(loc.global_id_local).or_insert(loc);
    }

    batch
        .data
        .iter()
        .map(|forecast| {
            let location = by_id.get(&forecast.global_id_local);

            let location_name = location
                .map(|l| l.local.as_str())
                .filter(|name| !name.is_empty())
                .unwrap_or(UNKNOWN_LOCATION)
                .to_string();
            let district = location
                .and_then(|l| l.dico.as_deref())
                .filter(|d| !d.is_empty())
                .map(str::to_string);

            EnhancedForecastRecord {
                forecast: forecast.clone(),
                location_name,
                district,
            }
        })
        .collect()
}

/// Cached access to IPMA data.
pub struct ForecastService {
    client: IpmaClient,
    locations: TtlSlot<Vec<Location>>,
    weather_types: TtlSlot<Vec<WeatherType>>,
}

impl ForecastService {
    pub fn new(client: IpmaClient, cache_ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            client,
            locations: TtlSlot::new("locations", cache_ttl, Arc::clone(&clock)),
            weather_types: TtlSlot::new("weather types", cache_ttl, clock),
        }
    }

    pub async fn get_locations(&self) -> Result<Arc<Vec<Location>>, AppError> {
        self.locations
            .get_or_refresh(|| self.client.locations())
            .await
    }

    pub async fn get_weather_types(&self) -> Result<Arc<Vec<WeatherType>>, AppError> {
        self.weather_types
            .get_or_refresh(|| self.client.weather_types())
            .await
    }

    /// Fetch a daily forecast file. Never cached.
    pub async fn get_forecast_by_day(&self, day: ForecastDay) -> Result<ForecastBatch, AppError> {
        tracing::info!("Fetching day {} forecast data from IPMA", day);
        self.client.daily_forecast(day).await
    }

    /// Fetch a forecast file and the locations concurrently, then enrich.
    pub async fn get_enhanced_forecast_by_day(
        &self,
        day: ForecastDay,
    ) -> Result<EnhancedForecast, AppError> {
        let (batch, locations) =
            futures::future::try_join(self.get_forecast_by_day(day), self.get_locations()).await?;

        Ok(EnhancedForecast {
            metadata: ForecastMetadata::from(&batch),
            data: enrich(&batch, &locations),
        })
    }

    /// Enriched forecast for one location, or `None` if the batch has no
    /// record for it.
    pub async fn get_forecast_by_location(
        &self,
        location_id: i64,
        day: ForecastDay,
    ) -> Result<Option<LocationForecast>, AppError> {
        let enhanced = self.get_enhanced_forecast_by_day(day).await?;
        let metadata = enhanced.metadata;
        Ok(enhanced
            .data
            .into_iter()
            .find(|r| r.forecast.global_id_local == location_id)
            .map(|data| LocationForecast { metadata, data }))
    }

    /// Reset both metadata slots. Forecasts are not cached, so there is
    /// nothing else to drop.
    pub fn clear_cache(&self) {
        tracing::info!("Clearing IPMA service cache");
        self.locations.clear();
        self.weather_types.clear();
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    pub(crate) fn location(id: i64, local: &str, dico: Option<&str>) -> Value {
        let mut v = json!({
            "idRegiao": 1,
            "idAreaAviso": "PTO",
            "idConcelho": 12,
            "globalIdLocal": id,
            "latitude": "41.1580",
            "idDistrito": 13,
            "local": local,
            "longitude": "-8.6294"
        });
        if let Some(d) = dico {
            v["dico"] = json!(d);
        }
        v
    }

    pub(crate) fn locations_body(locations: Vec<Value>) -> Value {
        json!({ "owner": "IPMA", "country": "PT", "data": locations })
    }

    pub(crate) fn forecast_record(id: i64) -> Value {
        json!({
            "precipitaProb": "20.0",
            "tMin": "11.8",
            "tMax": "22.4",
            "predWindDir": "NW",
            "idWeatherType": 3,
            "classWindSpeed": 2,
            "longitude": "-8.6294",
            "forecastDate": "2026-10-19",
            "latitude": "41.1580",
            "globalIdLocal": id
        })
    }

    pub(crate) fn forecast_body(ids: &[i64]) -> Value {
        json!({
            "owner": "IPMA",
            "country": "PT",
            "forecastDate": "2026-10-19",
            "dataUpdate": "2026-10-19T10:31:03",
            "data": ids.iter().map(|id| forecast_record(*id)).collect::<Vec<_>>()
        })
    }

    pub(crate) fn weather_types_body() -> Value {
        json!({
            "owner": "IPMA",
            "country": "PT",
            "data": [
                { "descWeatherTypeEN": "No information", "descWeatherTypePT": "---", "idWeatherType": -99 },
                { "descWeatherTypeEN": "Clear sky", "descWeatherTypePT": "Céu limpo", "idWeatherType": 1 }
            ]
        })
    }
}
