//! Typed KPI results.
//!
//! Each KPI kind produces exactly one of these shapes. They are built fresh
//! per request and serialized as plain JSON for the presentation layer.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A labeled count, e.g. one slice of a donut chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LabeledCount {
    pub label: String,
    pub count: u64,
}

impl LabeledCount {
    pub fn new(label: impl Into<String>, count: u64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HourlyCount {
    pub hour: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MinuteCount {
    pub minute: String,
    pub count: u64,
}

/// One hour of a stacked series: the top N labels plus an optional `OTHER` remainder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HourlyStacked {
    pub hour: String,
    pub total: u64,
    pub series: Vec<LabeledCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HourlyErrorRate {
    pub hour: String,
    pub total: u64,
    pub errors: u64,
    /// Percentage of failed events, rounded to 2 decimals.
    pub error_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HourlyDurationStats {
    pub hour: String,
    pub avg_duration_ms: f64,
    pub p95_duration_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuccessRate {
    pub total: u64,
    pub success: u64,
    pub success_rate: f64,
}

/// A leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RankedEntry {
    pub key: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteVolumeSuccess {
    pub site_id: String,
    pub total: u64,
    pub success: u64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HourlyUniqueCount {
    pub hour: String,
    pub unique: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventTypeSuccess {
    pub event_type: String,
    pub total: u64,
    pub success: u64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventTypeDurationStats {
    pub event_type: String,
    pub avg_duration_ms: f64,
    pub p95_duration_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActorActivity {
    pub actor_id: String,
    pub total: u64,
    pub success: u64,
    pub success_rate: f64,
    pub unique_sessions: u64,
    pub avg_duration_ms: f64,
}

/// A single stored event, as returned by the longest-events KPI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LongestEvent {
    pub id: String,
    pub timestamp: String,
    pub event_type: String,
    pub session_id: String,
    pub actor_id: String,
    pub site_id: String,
    pub duration_ms: u64,
    pub success: bool,
}

/// The result of one KPI computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KpiValue {
    LabeledCounts(Vec<LabeledCount>),
    HourlyCounts(Vec<HourlyCount>),
    MinuteCounts(Vec<MinuteCount>),
    HourlyStacked(Vec<HourlyStacked>),
    HourlyErrorRates(Vec<HourlyErrorRate>),
    HourlyDurationStats(Vec<HourlyDurationStats>),
    SuccessRate(SuccessRate),
    Ranked(Vec<RankedEntry>),
    SiteVolumeSuccess(Vec<SiteVolumeSuccess>),
    HourlyUniqueCounts(Vec<HourlyUniqueCount>),
    EventTypeSuccess(Vec<EventTypeSuccess>),
    EventTypeDurationStats(Vec<EventTypeDurationStats>),
    ActorActivity(Vec<ActorActivity>),
    LongestEvents(Vec<LongestEvent>),
}

impl KpiValue {
    /// Number of rows in the result; 1 for single-record results.
    pub fn row_count(&self) -> usize {
        match self {
            KpiValue::LabeledCounts(v) => v.len(),
            KpiValue::HourlyCounts(v) => v.len(),
            KpiValue::MinuteCounts(v) => v.len(),
            KpiValue::HourlyStacked(v) => v.len(),
            KpiValue::HourlyErrorRates(v) => v.len(),
            KpiValue::HourlyDurationStats(v) => v.len(),
            KpiValue::SuccessRate(_) => 1,
            KpiValue::Ranked(v) => v.len(),
            KpiValue::SiteVolumeSuccess(v) => v.len(),
            KpiValue::HourlyUniqueCounts(v) => v.len(),
            KpiValue::EventTypeSuccess(v) => v.len(),
            KpiValue::EventTypeDurationStats(v) => v.len(),
            KpiValue::ActorActivity(v) => v.len(),
            KpiValue::LongestEvents(v) => v.len(),
        }
    }
}
