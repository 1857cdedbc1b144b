//! Storage layer for the KPI engine.
//!
//! The engine talks to its analytics store only through [`AnalyticsStore`],
//! so handlers and the dispatcher can be exercised against an in-memory fake.

mod elastic;
#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::WarehouseEvent;
use crate::error::KpiResult;

pub use elastic::ElasticStore;

/// Search/index port over the warehouse event store.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Run a search request and return the raw response body.
    ///
    /// Transport failures and non-success statuses surface as
    /// [`KpiError::StoreUnavailable`](crate::error::KpiError::StoreUnavailable).
    async fn search(&self, body: &Value) -> KpiResult<String>;

    /// Store one event under its id.
    async fn index_event(&self, event: &WarehouseEvent) -> KpiResult<()>;

    /// Whether the store currently answers.
    async fn ping(&self) -> bool;
}
