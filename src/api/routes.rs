//! Route definitions for the API.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::AppState;

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_kpis,
        handlers::get_kpi,
        handlers::ingest_event,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::KpiListResponse,
        crate::api::types::KpiResponse,
        crate::api::types::HealthResponse,
        crate::domain::KpiDefinition,
        crate::domain::KpiKind,
        crate::domain::ChartType,
        crate::domain::NewEventRequest,
        crate::domain::WarehouseEvent,
    )),
    tags(
        (name = "kpis", description = "KPI catalog and computation"),
        (name = "events", description = "Warehouse event ingestion"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Warehouse KPI API",
        version = "0.1.0",
        description = "Computes warehouse KPIs from aggregation queries over recorded events",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // KPIs
        .route("/v1/kpis", get(handlers::list_kpis))
        .route("/v1/kpis/:kpi_id", get(handlers::get_kpi))
        // Ingestion
        .route("/v1/events", post(handlers::ingest_event))
        // Health
        .route("/v1/health", get(handlers::health_check))
        .with_state(state)
        // OpenAPI docs
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
