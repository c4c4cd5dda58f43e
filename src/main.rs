// IPMA API wrapper v0.1
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod config;
mod errors;
mod helpers;
mod models;
mod routes;
mod services;

use config::AppConfig;
use routes::AppState;
use services::cache::SystemClock;
use services::forecast::ForecastService;
use services::ipma::IpmaClient;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; variables may come from the environment.
    let _ = dotenv::dotenv();

    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        process::exit(1)
    });

    init_tracing(&config);

    let http = reqwest::Client::builder().build().unwrap_or_else(|e| {
        tracing::error!("Failed to build HTTP client: {}", e);
        process::exit(1)
    });
    let ipma_client = IpmaClient::new(http, &config.ipma_base_url, &config.ipma_user_agent);
    let forecasts = ForecastService::new(ipma_client, config.cache_ttl, Arc::new(SystemClock));

    let app = app::build_router(AppState {
        forecasts: Arc::new(forecasts),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind {}: {}", addr, e);
            process::exit(1)
        });

    tracing::info!(
        "IPMA API wrapper listening on {} (environment: {}, cache TTL: {}s)",
        addr,
        config.environment,
        config.cache_ttl.as_secs()
    );
    tracing::info!(
        "Swagger UI available at http://localhost:{}/api-docs/",
        config.port
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server terminated unexpectedly: {}", e);
        process::exit(1);
    }

    tracing::info!("Server shut down");
}

/// Human-readable logs in development, JSON lines in production.
/// `RUST_LOG` takes precedence over `LOG_LEVEL`.
fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "ipma_api={level},tower_http={level}",
            level = config.log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.is_production() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolve on SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("SIGINT received, shutting down gracefully"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down gracefully"),
    }
}
