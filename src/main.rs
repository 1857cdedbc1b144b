//! Warehouse KPI service
//!
//! Compiles KPI requests into aggregation queries against an analytics
//! store and turns the answers into typed, chart-ready results.

use std::sync::Arc;

use tokio::net::TcpListener;

mod api;
mod config;
mod domain;
mod engine;
mod error;
mod logging;
mod storage;

use crate::api::build_router;
use crate::config::Config;
use crate::engine::{KpiDispatcher, KpiRegistry, RequestNormalizer};
use crate::storage::{AnalyticsStore, ElasticStore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Runs KPI queries against the store.
    pub dispatcher: KpiDispatcher,
    /// Static KPI catalog.
    pub registry: Arc<KpiRegistry>,
    /// Request validation and clamping.
    pub normalizer: Arc<RequestNormalizer>,
    /// Analytics store, for ingestion and health checks.
    pub store: Arc<dyn AnalyticsStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    logging::init();

    tracing::info!("Starting KPI engine v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        store = %config.store.url,
        index = %config.store.index,
        max_window_days = config.limits.max_window_days,
        "Configuration loaded"
    );

    let store: Arc<dyn AnalyticsStore> = Arc::new(ElasticStore::new(&config.store).map_err(|e| {
        tracing::error!(error = %e, "Failed to build store client");
        anyhow::anyhow!("Store client error: {}", e)
    })?);

    if !store.ping().await {
        tracing::warn!(url = %config.store.url, "Analytics store is not reachable yet");
    }

    let normalizer = RequestNormalizer::new(config.limits.clone()).map_err(|e| {
        tracing::error!(error = %e, "Invalid request limits");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let state = AppState {
        dispatcher: KpiDispatcher::new(store.clone()),
        registry: Arc::new(KpiRegistry::new()),
        normalizer: Arc::new(normalizer),
        store,
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
