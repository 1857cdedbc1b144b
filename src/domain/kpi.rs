//! KPI identifiers and catalog metadata.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::KpiError;

/// Every KPI the engine knows how to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KpiKind {
    /// Event counts grouped by event type.
    EventTypeBreakdown,
    /// Total events per hour.
    EventsPerHour,
    /// Hourly event counts stacked by type, top N plus OTHER.
    EventsPerHourByType,
    /// Hourly percentage of failed events.
    ErrorRatePerHour,
    /// Hourly average and p95 duration.
    DurationStatsPerHour,
    /// Overall percentage of successful events.
    SuccessRate,
    /// Actors ranked by event count.
    TopActors,
    /// Event volume and success rate per site.
    SiteVolumeAndSuccess,
    /// Distinct actors per hour.
    UniqueActorsPerHour,
    /// Distinct sessions per hour.
    UniqueSessionsPerHour,
    /// Success rate per event type.
    SuccessRateByEventType,
    /// Average and p95 duration per event type.
    DurationStatsByEventType,
    /// Sessions ranked by event count.
    TopSessionsByEventCount,
    /// Event types ranked by event count.
    TopEventTypes,
    /// Total events per minute.
    ThroughputPerMinute,
    /// Failed events grouped by event type.
    ErrorTypesBreakdown,
    /// Per-actor volume, success, sessions and duration.
    ActorActivitySummary,
    /// Individual events with the longest duration.
    TopLongestEvents,
}

impl KpiKind {
    /// All kinds, in catalog order.
    pub const ALL: [KpiKind; 18] = [
        KpiKind::EventTypeBreakdown,
        KpiKind::EventsPerHour,
        KpiKind::EventsPerHourByType,
        KpiKind::ErrorRatePerHour,
        KpiKind::DurationStatsPerHour,
        KpiKind::SuccessRate,
        KpiKind::TopActors,
        KpiKind::SiteVolumeAndSuccess,
        KpiKind::UniqueActorsPerHour,
        KpiKind::UniqueSessionsPerHour,
        KpiKind::SuccessRateByEventType,
        KpiKind::DurationStatsByEventType,
        KpiKind::TopSessionsByEventCount,
        KpiKind::TopEventTypes,
        KpiKind::ThroughputPerMinute,
        KpiKind::ErrorTypesBreakdown,
        KpiKind::ActorActivitySummary,
        KpiKind::TopLongestEvents,
    ];

    /// Wire identifier, e.g. `EVENTS_PER_HOUR`.
    pub fn as_str(&self) -> &'static str {
        match self {
            KpiKind::EventTypeBreakdown => "EVENT_TYPE_BREAKDOWN",
            KpiKind::EventsPerHour => "EVENTS_PER_HOUR",
            KpiKind::EventsPerHourByType => "EVENTS_PER_HOUR_BY_TYPE",
            KpiKind::ErrorRatePerHour => "ERROR_RATE_PER_HOUR",
            KpiKind::DurationStatsPerHour => "DURATION_STATS_PER_HOUR",
            KpiKind::SuccessRate => "SUCCESS_RATE",
            KpiKind::TopActors => "TOP_ACTORS",
            KpiKind::SiteVolumeAndSuccess => "SITE_VOLUME_AND_SUCCESS",
            KpiKind::UniqueActorsPerHour => "UNIQUE_ACTORS_PER_HOUR",
            KpiKind::UniqueSessionsPerHour => "UNIQUE_SESSIONS_PER_HOUR",
            KpiKind::SuccessRateByEventType => "SUCCESS_RATE_BY_EVENT_TYPE",
            KpiKind::DurationStatsByEventType => "DURATION_STATS_BY_EVENT_TYPE",
            KpiKind::TopSessionsByEventCount => "TOP_SESSIONS_BY_EVENT_COUNT",
            KpiKind::TopEventTypes => "TOP_EVENT_TYPES",
            KpiKind::ThroughputPerMinute => "THROUGHPUT_PER_MINUTE",
            KpiKind::ErrorTypesBreakdown => "ERROR_TYPES_BREAKDOWN",
            KpiKind::ActorActivitySummary => "ACTOR_ACTIVITY_SUMMARY",
            KpiKind::TopLongestEvents => "TOP_LONGEST_EVENTS",
        }
    }
}

impl std::fmt::Display for KpiKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for KpiKind {
    type Err = KpiError;

    /// Accepts the wire identifier in any letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        KpiKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| KpiError::UnsupportedKpi(s.to_string()))
    }
}

/// How the presentation layer should draw a KPI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChartType {
    Donut,
    Line,
    StackedBar,
    Gauge,
    Leaderboard,
    Bar,
    Table,
}

/// Descriptive metadata for one KPI.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KpiDefinition {
    pub id: KpiKind,
    pub name: String,
    pub description: String,
    pub chart_type: ChartType,
}
