//! KPI Dispatcher - runs one KPI against the analytics store.
//!
//! Build the query, make exactly one store call, parse the answer. Errors
//! from any step are returned as-is; no fallback value is ever produced.

use std::sync::Arc;
use std::time::Instant;

use crate::domain::{KpiKind, KpiRequest, KpiValue};
use crate::engine::parser;
use crate::engine::plan::KpiPlan;
use crate::engine::query;
use crate::error::KpiResult;
use crate::storage::AnalyticsStore;

/// Routes KPI requests to their query/parse pair.
#[derive(Clone)]
pub struct KpiDispatcher {
    store: Arc<dyn AnalyticsStore>,
}

impl KpiDispatcher {
    pub fn new(store: Arc<dyn AnalyticsStore>) -> Self {
        Self { store }
    }

    /// Compute one KPI for a normalized request.
    pub async fn dispatch(&self, kind: KpiKind, request: &KpiRequest) -> KpiResult<KpiValue> {
        let started = Instant::now();
        let opts = KpiPlan::for_kind(kind).options(request);

        let search = query::build(kind, request);
        tracing::debug!(kpi = %kind, query = %search, "Dispatching KPI query");

        let body = self.store.search(&search).await.map_err(|e| {
            tracing::warn!(kpi = %kind, error = %e, "KPI query failed");
            e
        })?;
        let value = parser::parse(kind, &body, &opts)?;

        tracing::info!(
            kpi = %kind,
            site_id = ?request.site_id,
            rows = value.row_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "KPI computed"
        );

        Ok(value)
    }
}
