//! Router assembly and OpenAPI document.

use axum::routing::{delete, get};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::routes::{self, AppState};

/// IPMA API wrapper: OpenAPI specification.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "IPMA API Wrapper",
        version = "0.1.0",
        description = "Simplified, cached access to the open data of IPMA \
            (Instituto Português do Mar e da Atmosfera). Locations and weather \
            types are cached in memory; daily forecasts are fetched live and \
            enriched with location names and districts. All routes are also \
            served without the /api/v1 prefix.",
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Locations", description = "Portuguese locations and districts"),
        (name = "Weather Types", description = "Weather type classifications"),
        (name = "Forecasts", description = "Daily weather forecasts"),
        (name = "Cache", description = "Cache management"),
    ),
    paths(
        routes::health::health_check,
        routes::locations::list_locations,
        routes::locations::list_weather_types,
        routes::forecasts::get_forecast,
        routes::forecasts::get_location_forecast,
        routes::cache::clear_cache,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::health::HealthStatus,
            routes::locations::LocationsResponse,
            routes::locations::WeatherTypesResponse,
            routes::forecasts::ForecastListResponse,
            routes::forecasts::LocationForecastResponse,
            routes::cache::CacheClearedResponse,
            routes::cache::CacheMessage,
            crate::models::Location,
            crate::models::WeatherType,
            crate::models::ForecastRecord,
            crate::models::EnhancedForecastRecord,
            crate::models::ForecastMetadata,
            crate::errors::ErrorResponse,
        )
    )
)]
pub struct ApiDoc;

/// Build the full application router.
///
/// API routes are mounted under `/api/v1` and at the root. Unknown paths
/// and unsupported methods on known paths both get the JSON 404.
pub fn build_router(state: AppState) -> Router {
    let api: Router<AppState> = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/locations", get(routes::locations::list_locations))
        .route("/weather-types", get(routes::locations::list_weather_types))
        .route("/forecast/current", get(routes::forecasts::get_forecast))
        .route("/forecast/daily", get(routes::forecasts::get_forecast))
        .route(
            "/forecast/daily/:location_id",
            get(routes::forecasts::get_location_forecast),
        )
        .route("/cache", delete(routes::cache::clear_cache));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", api.clone())
        .merge(api)
        .with_state(state)
        .merge(SwaggerUi::new("/api-docs").url("/api-docs.json", ApiDoc::openapi()))
        .fallback(routes::not_found)
        .method_not_allowed_fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
