//! IPMA open-data client.
//!
//! Fetches JSON files from the Portuguese weather agency's public API.
//! See: https://api.ipma.pt/

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{ForecastBatch, ForecastDay, Location, WeatherType};

pub const LOCATIONS_PATH: &str = "/distrits-islands.json";
pub const WEATHER_TYPES_PATH: &str = "/weather-type-classe.json";

/// Path of the daily forecast file for all cities on the given day.
pub fn forecast_path(day: ForecastDay) -> String {
    format!(
        "/forecast/meteorology/cities/daily/hp-daily-forecast-day{}.json",
        day.index()
    )
}

// --- IPMA JSON envelope types ---

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: Vec<T>,
}

/// Client for the IPMA open-data API.
#[derive(Debug, Clone)]
pub struct IpmaClient {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl IpmaClient {
    pub fn new(client: reqwest::Client, base_url: &str, user_agent: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    /// GET `{base_url}{endpoint}` and deserialize the body as `T`.
    ///
    /// Transport errors, non-2xx statuses and malformed JSON all map to
    /// `AppError::UpstreamFailure` carrying the endpoint path. No retries.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, AppError> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::info!("Fetching data from {}", endpoint);

        let failure = |reason: String| {
            tracing::error!("Failed to fetch data from {}: {}", endpoint, reason);
            AppError::UpstreamFailure {
                endpoint: endpoint.to_string(),
                reason,
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .map_err(|e| AppError::InternalError(format!("Invalid User-Agent: {}", e)))?,
        );

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| failure(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(failure(format!("HTTP {}", response.status())));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| failure(format!("JSON parse error: {}", e)))
    }

    pub async fn locations(&self) -> Result<Vec<Location>, AppError> {
        let envelope: DataEnvelope<Location> = self.fetch(LOCATIONS_PATH).await?;
        Ok(envelope.data)
    }

    pub async fn weather_types(&self) -> Result<Vec<WeatherType>, AppError> {
        let envelope: DataEnvelope<WeatherType> = self.fetch(WEATHER_TYPES_PATH).await?;
        Ok(envelope.data)
    }

    pub async fn daily_forecast(&self, day: ForecastDay) -> Result<ForecastBatch, AppError> {
        self.fetch(&forecast_path(day)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> IpmaClient {
        IpmaClient::new(reqwest::Client::new(), &server.uri(), "ipma-api-test/0.1")
    }

    #[test]
    fn test_forecast_paths() {
        assert_eq!(
            forecast_path(ForecastDay::TODAY),
            "/forecast/meteorology/cities/daily/hp-daily-forecast-day0.json"
        );
        assert_eq!(
            forecast_path(ForecastDay::try_from(2_i64).unwrap()),
            "/forecast/meteorology/cities/daily/hp-daily-forecast-day2.json"
        );
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let client = IpmaClient::new(reqwest::Client::new(), "http://example.test/open-data/", "ua");
        assert_eq!(client.base_url, "http://example.test/open-data");
    }

    #[tokio::test]
    async fn test_locations_ok() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LOCATIONS_PATH))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "owner": "IPMA",
                "country": "PT",
                "data": [{
                    "idRegiao": 1, "idAreaAviso": "AVR", "idConcelho": 5,
                    "globalIdLocal": 1010500, "latitude": "40.6413",
                    "idDistrito": 1, "local": "Aveiro", "longitude": "-8.6535"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let locations = client_for(&server).locations().await.unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].local, "Aveiro");
    }

    #[tokio::test]
    async fn test_non_2xx_is_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(WEATHER_TYPES_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).weather_types().await.unwrap_err();
        match err {
            AppError::UpstreamFailure { endpoint, reason } => {
                assert_eq!(endpoint, WEATHER_TYPES_PATH);
                assert!(reason.contains("503"));
            }
            other => panic!("expected UpstreamFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_upstream_failure() {
        let server = MockServer::start().await;
        let day1 = ForecastDay::try_from(1_i64).unwrap();
        Mock::given(method("GET"))
            .and(path(forecast_path(day1)))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"owner\": \"IPMA\""))
            .mount(&server)
            .await;

        let err = client_for(&server).daily_forecast(day1).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::UpstreamFailure { ref endpoint, .. } if endpoint.ends_with("day1.json")
        ));
    }

    #[tokio::test]
    async fn test_connection_refused_is_upstream_failure() {
        // Nothing listens on the discard port.
        let client = IpmaClient::new(reqwest::Client::new(), "http://127.0.0.1:9", "ua");
        let err = client.locations().await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamFailure { .. }));
    }
}
