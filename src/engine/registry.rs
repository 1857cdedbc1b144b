//! KPI Registry - static catalog of the KPIs the engine can compute.

use crate::domain::{ChartType, KpiDefinition, KpiKind};

/// Catalog of KPI definitions, one per [`KpiKind`] in declaration order.
#[derive(Debug, Clone)]
pub struct KpiRegistry {
    definitions: Vec<KpiDefinition>,
}

impl KpiRegistry {
    pub fn new() -> Self {
        let definitions = KpiKind::ALL
            .iter()
            .map(|&kind| {
                let (name, description, chart_type) = describe(kind);
                KpiDefinition {
                    id: kind,
                    name: name.to_string(),
                    description: description.to_string(),
                    chart_type,
                }
            })
            .collect();

        Self { definitions }
    }

    pub fn list_all(&self) -> &[KpiDefinition] {
        &self.definitions
    }
}

impl Default for KpiRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn describe(kind: KpiKind) -> (&'static str, &'static str, ChartType) {
    match kind {
        KpiKind::EventTypeBreakdown => (
            "Event Type Breakdown",
            "Distribution of events grouped by type.",
            ChartType::Donut,
        ),
        KpiKind::EventsPerHour => (
            "Events Per Hour",
            "Total events aggregated per hour.",
            ChartType::Line,
        ),
        KpiKind::EventsPerHourByType => (
            "Events Per Hour By Type",
            "Stacked hourly event counts grouped by type.",
            ChartType::StackedBar,
        ),
        KpiKind::ErrorRatePerHour => (
            "Error Rate Per Hour",
            "Hourly error percentage across events.",
            ChartType::Line,
        ),
        KpiKind::DurationStatsPerHour => (
            "Duration Stats Per Hour",
            "Average and P95 duration metrics per hour.",
            ChartType::Line,
        ),
        KpiKind::SuccessRate => (
            "Success Rate",
            "Overall percentage of successful events.",
            ChartType::Gauge,
        ),
        KpiKind::TopActors => (
            "Top Actors",
            "Top performing actors ranked by event count.",
            ChartType::Leaderboard,
        ),
        KpiKind::SiteVolumeAndSuccess => (
            "Site Volume And Success",
            "Event volume and success rate per site.",
            ChartType::Bar,
        ),
        KpiKind::UniqueActorsPerHour => (
            "Unique Actors Per Hour",
            "Distinct actors active in each hour.",
            ChartType::Line,
        ),
        KpiKind::UniqueSessionsPerHour => (
            "Unique Sessions Per Hour",
            "Distinct sessions active in each hour.",
            ChartType::Line,
        ),
        KpiKind::SuccessRateByEventType => (
            "Success Rate By Event Type",
            "Success percentage for each event type.",
            ChartType::Bar,
        ),
        KpiKind::DurationStatsByEventType => (
            "Duration Stats By Event Type",
            "Average and P95 duration for each event type.",
            ChartType::Bar,
        ),
        KpiKind::TopSessionsByEventCount => (
            "Top Sessions",
            "Sessions ranked by event count.",
            ChartType::Leaderboard,
        ),
        KpiKind::TopEventTypes => (
            "Top Event Types",
            "Event types ranked by volume.",
            ChartType::Leaderboard,
        ),
        KpiKind::ThroughputPerMinute => (
            "Throughput Per Minute",
            "Events recorded in each minute.",
            ChartType::Line,
        ),
        KpiKind::ErrorTypesBreakdown => (
            "Error Types Breakdown",
            "Failed events grouped by type.",
            ChartType::Donut,
        ),
        KpiKind::ActorActivitySummary => (
            "Actor Activity Summary",
            "Volume, success, sessions and duration per actor.",
            ChartType::Table,
        ),
        KpiKind::TopLongestEvents => (
            "Top Longest Events",
            "Individual events with the longest duration.",
            ChartType::Table,
        ),
    }
}
