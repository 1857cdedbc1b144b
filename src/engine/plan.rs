//! KPI dispatch table.
//!
//! One entry per [`KpiKind`], pairing the query builder with the result
//! parser. The `match` in [`KpiPlan::for_kind`] is exhaustive, so a new
//! kind does not compile until it has both halves.

use crate::domain::{KpiKind, KpiRequest, KpiValue};
use crate::engine::parser::{self, Node};
use crate::engine::query::{self, SearchBody};

/// Default series kept per hour by the stacked-by-type KPI.
pub const DEFAULT_TOP_N: u32 = 5;
/// Default rows returned by ranked KPIs.
pub const DEFAULT_LIMIT: u32 = 10;

pub type BuildFn = fn(&KpiRequest, &KpiOptions) -> SearchBody;
pub type ParseFn = fn(Node<'_>, &KpiOptions) -> KpiValue;

/// Per-request options after kind defaults are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KpiOptions {
    pub top_n: u32,
    pub limit: u32,
}

/// Builder, parser and defaults for one KPI kind.
#[derive(Clone, Copy)]
pub struct KpiPlan {
    pub build: BuildFn,
    pub parse: ParseFn,
    default_top_n: u32,
    default_limit: u32,
}

impl KpiPlan {
    fn new(build: BuildFn, parse: ParseFn) -> Self {
        Self {
            build,
            parse,
            default_top_n: DEFAULT_TOP_N,
            default_limit: DEFAULT_LIMIT,
        }
    }

    /// Look up the plan for a kind.
    pub fn for_kind(kind: KpiKind) -> Self {
        match kind {
            KpiKind::EventTypeBreakdown => {
                Self::new(query::event_type_breakdown, parser::event_type_breakdown)
            }
            KpiKind::EventsPerHour => Self::new(query::events_per_hour, parser::events_per_hour),
            KpiKind::EventsPerHourByType => Self::new(
                query::events_per_hour_by_type,
                parser::events_per_hour_by_type,
            ),
            KpiKind::ErrorRatePerHour => {
                Self::new(query::error_rate_per_hour, parser::error_rate_per_hour)
            }
            KpiKind::DurationStatsPerHour => Self::new(
                query::duration_stats_per_hour,
                parser::duration_stats_per_hour,
            ),
            KpiKind::SuccessRate => Self::new(query::success_rate, parser::success_rate),
            KpiKind::TopActors => Self::new(query::top_actors, parser::top_actors),
            KpiKind::SiteVolumeAndSuccess => Self::new(
                query::site_volume_and_success,
                parser::site_volume_and_success,
            ),
            KpiKind::UniqueActorsPerHour => Self::new(
                query::unique_actors_per_hour,
                parser::unique_actors_per_hour,
            ),
            KpiKind::UniqueSessionsPerHour => Self::new(
                query::unique_sessions_per_hour,
                parser::unique_sessions_per_hour,
            ),
            KpiKind::SuccessRateByEventType => Self::new(
                query::success_rate_by_event_type,
                parser::success_rate_by_event_type,
            ),
            KpiKind::DurationStatsByEventType => Self::new(
                query::duration_stats_by_event_type,
                parser::duration_stats_by_event_type,
            ),
            KpiKind::TopSessionsByEventCount => Self::new(
                query::top_sessions_by_event_count,
                parser::top_sessions_by_event_count,
            ),
            KpiKind::TopEventTypes => Self::new(query::top_event_types, parser::top_event_types),
            KpiKind::ThroughputPerMinute => {
                Self::new(query::throughput_per_minute, parser::throughput_per_minute)
            }
            KpiKind::ErrorTypesBreakdown => {
                Self::new(query::error_types_breakdown, parser::error_types_breakdown)
            }
            KpiKind::ActorActivitySummary => Self::new(
                query::actor_activity_summary,
                parser::actor_activity_summary,
            ),
            KpiKind::TopLongestEvents => {
                Self::new(query::top_longest_events, parser::top_longest_events)
            }
        }
    }

    /// Fill any option the request left unset with this kind's default.
    pub fn options(&self, request: &KpiRequest) -> KpiOptions {
        KpiOptions {
            top_n: request.top_n.unwrap_or(self.default_top_n).max(1),
            limit: request.limit.unwrap_or(self.default_limit).max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn request() -> KpiRequest {
        KpiRequest::window(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_unset_options_take_kind_defaults() {
        let plan = KpiPlan::for_kind(KpiKind::EventsPerHourByType);
        assert_eq!(
            plan.options(&request()),
            KpiOptions {
                top_n: DEFAULT_TOP_N,
                limit: DEFAULT_LIMIT
            }
        );
    }

    #[test]
    fn test_explicit_options_win() {
        let plan = KpiPlan::for_kind(KpiKind::TopActors);
        let opts = plan.options(&request().with_limit(3).with_top_n(2));
        assert_eq!(opts.limit, 3);
        assert_eq!(opts.top_n, 2);
    }
}
