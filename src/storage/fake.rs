//! In-memory [`AnalyticsStore`] for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::WarehouseEvent;
use crate::error::{KpiError, KpiResult};
use crate::storage::AnalyticsStore;

/// Answers every search with one canned body and records what it was sent.
pub struct FakeStore {
    response: Result<String, String>,
    pub queries: Mutex<Vec<Value>>,
    pub events: Mutex<Vec<WarehouseEvent>>,
}

impl FakeStore {
    pub fn answering(body: Value) -> Arc<Self> {
        Self::answering_raw(&body.to_string())
    }

    pub fn answering_raw(body: &str) -> Arc<Self> {
        Self::with_response(Ok(body.to_string()))
    }

    /// A store that is down.
    pub fn failing() -> Arc<Self> {
        Self::with_response(Err("connection refused".to_string()))
    }

    fn with_response(response: Result<String, String>) -> Arc<Self> {
        Arc::new(Self {
            response,
            queries: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl AnalyticsStore for FakeStore {
    async fn search(&self, body: &Value) -> KpiResult<String> {
        self.queries.lock().unwrap().push(body.clone());
        self.response.clone().map_err(KpiError::StoreUnavailable)
    }

    async fn index_event(&self, event: &WarehouseEvent) -> KpiResult<()> {
        self.response
            .as_ref()
            .map_err(|e| KpiError::StoreUnavailable(e.clone()))?;
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn ping(&self) -> bool {
        self.response.is_ok()
    }
}
