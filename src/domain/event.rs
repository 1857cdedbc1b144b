//! Warehouse event records.
//!
//! Events are written once by ingestion and only ever read back through
//! aggregation queries.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{KpiError, KpiResult};

/// A recorded warehouse event as stored in the analytics index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseEvent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub session_id: String,
    pub actor_id: String,
    pub site_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

impl WarehouseEvent {
    /// Document body written to the store. The id travels in the URL, not the body.
    pub fn to_document(&self) -> serde_json::Value {
        let mut doc = serde_json::json!({
            "timestamp": self.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            "eventType": self.event_type,
            "sessionId": self.session_id,
            "actorId": self.actor_id,
            "siteId": self.site_id,
        });
        if let Some(duration) = self.duration_ms {
            doc["durationMs"] = duration.into();
        }
        if let Some(success) = self.success {
            doc["success"] = success.into();
        }
        doc
    }
}

/// Incoming event from a producer.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewEventRequest {
    /// ISO-8601 instant.
    pub timestamp: Option<String>,
    pub event_type: Option<String>,
    pub session_id: Option<String>,
    pub actor_id: Option<String>,
    pub site_id: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub success: Option<bool>,
}

impl NewEventRequest {
    /// Validate required fields and assign a fresh id.
    pub fn into_event(self) -> KpiResult<WarehouseEvent> {
        let raw_timestamp = required("timestamp", self.timestamp)?;
        let timestamp = DateTime::parse_from_rfc3339(&raw_timestamp)
            .map_err(|e| {
                KpiError::InvalidRequest(format!(
                    "'timestamp' is not an ISO-8601 instant ({}): {}",
                    raw_timestamp, e
                ))
            })?
            .with_timezone(&Utc);

        Ok(WarehouseEvent {
            id: Uuid::new_v4(),
            timestamp,
            event_type: required("eventType", self.event_type)?,
            session_id: required("sessionId", self.session_id)?,
            actor_id: required("actorId", self.actor_id)?,
            site_id: required("siteId", self.site_id)?,
            duration_ms: self.duration_ms,
            success: self.success,
        })
    }
}

fn required(field: &str, value: Option<String>) -> KpiResult<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(KpiError::InvalidRequest(format!("'{}' is required", field))),
    }
}
