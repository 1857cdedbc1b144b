//! HTTP request handlers.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::SecondsFormat;

use crate::api::types::*;
use crate::domain::{KpiKind, NewEventRequest, RawKpiRequest, WarehouseEvent};
use crate::error::{KpiError, KpiResult};
use crate::AppState;

/// List every KPI the engine can compute.
///
/// GET /v1/kpis
#[utoipa::path(
    get,
    path = "/v1/kpis",
    responses(
        (status = 200, description = "KPI catalog", body = KpiListResponse)
    ),
    tag = "kpis"
)]
pub async fn list_kpis(State(state): State<AppState>) -> Json<KpiListResponse> {
    Json(KpiListResponse {
        kpis: state.registry.list_all().to_vec(),
    })
}

/// Compute one KPI over a time window.
///
/// GET /v1/kpis/{kpi_id}
#[utoipa::path(
    get,
    path = "/v1/kpis/{kpi_id}",
    params(
        ("kpi_id" = String, Path, description = "KPI identifier, e.g. EVENTS_PER_HOUR"),
        RawKpiRequest
    ),
    responses(
        (status = 200, description = "KPI computed", body = KpiResponse),
        (status = 400, description = "Invalid window or parameters"),
        (status = 404, description = "Unknown KPI"),
        (status = 502, description = "Analytics store unavailable or malformed response")
    ),
    tag = "kpis"
)]
pub async fn get_kpi(
    State(state): State<AppState>,
    Path(kpi_id): Path<String>,
    query: Result<Query<RawKpiRequest>, QueryRejection>,
) -> KpiResult<Json<KpiResponse>> {
    let kind: KpiKind = kpi_id.parse()?;
    let Query(raw) = query.map_err(|e| KpiError::InvalidRequest(e.body_text()))?;
    let request = state.normalizer.normalize(&raw)?;
    let data = state.dispatcher.dispatch(kind, &request).await?;

    Ok(Json(KpiResponse {
        kpi: kind,
        from: request.from.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        to: request.to.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        site_id: request.site_id,
        data,
    }))
}

/// Record one warehouse event.
///
/// POST /v1/events
#[utoipa::path(
    post,
    path = "/v1/events",
    request_body = NewEventRequest,
    responses(
        (status = 201, description = "Event stored", body = WarehouseEvent),
        (status = 400, description = "Invalid event"),
        (status = 502, description = "Analytics store unavailable")
    ),
    tag = "events"
)]
pub async fn ingest_event(
    State(state): State<AppState>,
    Json(request): Json<NewEventRequest>,
) -> KpiResult<(StatusCode, Json<WarehouseEvent>)> {
    let event = request.into_event()?;
    state.store.index_event(&event).await?;

    tracing::info!(
        event_id = %event.id,
        event_type = %event.event_type,
        site_id = %event.site_id,
        "Event ingested"
    );

    Ok((StatusCode::CREATED, Json(event)))
}

/// Health check endpoint.
///
/// GET /v1/health
#[utoipa::path(
    get,
    path = "/v1/health",
    responses(
        (status = 200, description = "Service status", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, store) = if state.store.ping().await {
        ("healthy", "reachable")
    } else {
        ("degraded", "unreachable")
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
