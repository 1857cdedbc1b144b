//! API request/response types.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{KpiDefinition, KpiKind, KpiValue};

/// Catalog of available KPIs.
#[derive(Debug, Serialize, ToSchema)]
pub struct KpiListResponse {
    pub kpis: Vec<KpiDefinition>,
}

/// One computed KPI.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KpiResponse {
    pub kpi: KpiKind,
    /// Normalized window start (RFC 3339, UTC).
    pub from: String,
    /// Normalized window end (RFC 3339, UTC).
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    /// Result rows; the shape depends on the KPI.
    #[schema(value_type = Object)]
    pub data: KpiValue,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Analytics store reachability.
    pub store: String,
    /// Timestamp.
    pub timestamp: String,
}
