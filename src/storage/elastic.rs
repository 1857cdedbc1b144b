//! HTTP client for an Elasticsearch-compatible store.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::domain::WarehouseEvent;
use crate::error::{KpiError, KpiResult};
use crate::storage::AnalyticsStore;

/// [`AnalyticsStore`] backed by the store's REST API.
#[derive(Debug, Clone)]
pub struct ElasticStore {
    client: reqwest::Client,
    base_url: String,
    index: String,
    credentials: Option<(String, Option<String>)>,
}

impl ElasticStore {
    pub fn new(config: &StoreConfig) -> KpiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| KpiError::Config(format!("failed to build store client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            index: config.index.clone(),
            credentials: config
                .username
                .clone()
                .map(|user| (user, config.password.clone())),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match &self.credentials {
            Some((user, password)) => builder.basic_auth(user, password.as_deref()),
            None => builder,
        }
    }

    /// Send the request and return the body of a successful response.
    async fn execute(&self, builder: reqwest::RequestBuilder) -> KpiResult<String> {
        let resp = builder
            .send()
            .await
            .map_err(|e| KpiError::StoreUnavailable(format!("request failed: {}", e)))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            KpiError::StoreUnavailable(format!("failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Store returned an error status");
            return Err(KpiError::StoreUnavailable(format!(
                "store returned {}: {}",
                status, text
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl AnalyticsStore for ElasticStore {
    async fn search(&self, body: &Value) -> KpiResult<String> {
        let path = format!("/{}/_search", self.index);
        debug!(index = %self.index, "Executing search");
        self.execute(self.request(reqwest::Method::POST, &path).json(body))
            .await
    }

    async fn index_event(&self, event: &WarehouseEvent) -> KpiResult<()> {
        let path = format!("/{}/_doc/{}", self.index, event.id);
        self.execute(
            self.request(reqwest::Method::PUT, &path)
                .json(&event.to_document()),
        )
        .await?;
        debug!(event_id = %event.id, "Event indexed");
        Ok(())
    }

    async fn ping(&self) -> bool {
        match self.request(reqwest::Method::GET, "/").send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!(error = %e, "Store ping failed");
                false
            }
        }
    }
}
