//! Aggregation Result Parser - turns store responses into typed KPI results.
//!
//! Responses are walked with [`Node`], a lenient cursor that reads missing
//! or null paths as zero/empty. The only hard failure is a body that is not
//! a JSON object at all.

use serde_json::Value;

use crate::domain::{
    ActorActivity, EventTypeDurationStats, EventTypeSuccess, HourlyCount, HourlyDurationStats,
    HourlyErrorRate, HourlyStacked, HourlyUniqueCount, KpiKind, KpiValue, LabeledCount,
    LongestEvent, MinuteCount, RankedEntry, SiteVolumeSuccess, SuccessRate,
};
use crate::engine::plan::{KpiOptions, KpiPlan};
use crate::engine::query::{fields, names};
use crate::error::{KpiError, KpiResult};

/// Label of the synthetic bucket holding everything past the top N.
pub const OTHER_LABEL: &str = "OTHER";

/// Key under which the store reports the 95th percentile.
const P95_KEY: &str = "95.0";

/// Read-only cursor into a JSON tree. Missing paths stay missing instead of failing.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a>(Option<&'a Value>);

impl<'a> Node<'a> {
    pub fn new(value: &'a Value) -> Self {
        Node(Some(value))
    }

    /// Child by object key.
    pub fn get(self, key: &str) -> Node<'a> {
        Node(self.0.and_then(|v| v.get(key)))
    }

    /// Descend through several object keys.
    pub fn at(self, path: &[&str]) -> Node<'a> {
        path.iter().fold(self, |node, key| node.get(key))
    }

    /// Non-null value present at this position.
    pub fn is_present(self) -> bool {
        !matches!(self.0, None | Some(Value::Null))
    }

    /// Elements of an array, or nothing.
    pub fn items(self) -> impl Iterator<Item = Node<'a>> {
        self.0
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .map(Node::new)
    }

    /// The `buckets` array of an aggregation.
    pub fn buckets(self) -> impl Iterator<Item = Node<'a>> {
        self.get("buckets").items()
    }

    /// Non-negative integer count; anything unreadable is 0.
    pub fn count(self) -> u64 {
        match self.0 {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// Floating point number; anything unreadable is 0.0.
    pub fn number(self) -> f64 {
        match self.0 {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }

    pub fn flag(self) -> bool {
        match self.0 {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Scalar rendered as text; `None` for missing, null and container values.
    pub fn text(self) -> Option<String> {
        match self.0 {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Round half-up to 2 decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Percentage of `matching` in `total`, rounded to 2 decimals. Zero total yields 0.0.
pub fn rate(matching: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2(matching as f64 * 100.0 / total as f64)
}

/// Keep the `top_n` largest entries and fold the rest into one `OTHER` entry.
///
/// Sorting is stable, so equal counts keep their bucket order. `OTHER` is
/// appended only when the folded remainder is positive.
pub fn collapse_top_n(mut entries: Vec<LabeledCount>, top_n: usize) -> Vec<LabeledCount> {
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    let other: u64 = entries.iter().skip(top_n).map(|e| e.count).sum();
    entries.truncate(top_n);
    if other > 0 {
        entries.push(LabeledCount::new(OTHER_LABEL, other));
    }
    entries
}

/// Parse a raw store response for the given KPI.
pub fn parse(kind: KpiKind, body: &str, opts: &KpiOptions) -> KpiResult<KpiValue> {
    let document: Value = serde_json::from_str(body)
        .map_err(|e| KpiError::MalformedResponse(format!("{} response is not JSON: {}", kind, e)))?;

    if !document.is_object() {
        return Err(KpiError::MalformedResponse(format!(
            "{} response is not a JSON object",
            kind
        )));
    }

    let plan = KpiPlan::for_kind(kind);
    Ok((plan.parse)(Node::new(&document), opts))
}

fn agg<'a>(root: Node<'a>, name: &str) -> Node<'a> {
    root.at(&["aggregations", name])
}

/// Terms buckets as (key, doc_count), skipping null keys.
fn keyed_counts<'a>(buckets: impl Iterator<Item = Node<'a>>) -> Vec<(String, u64)> {
    buckets
        .filter_map(|b| b.get("key").text().map(|key| (key, b.get("doc_count").count())))
        .collect()
}

fn labeled_counts<'a>(buckets: impl Iterator<Item = Node<'a>>) -> Vec<LabeledCount> {
    keyed_counts(buckets)
        .into_iter()
        .map(|(label, count)| LabeledCount { label, count })
        .collect()
}

fn ranked<'a>(buckets: impl Iterator<Item = Node<'a>>) -> Vec<RankedEntry> {
    keyed_counts(buckets)
        .into_iter()
        .map(|(key, count)| RankedEntry { key, count })
        .collect()
}

/// Histogram buckets paired with their formatted time key, skipping buckets without one.
fn timed<'a>(buckets: impl Iterator<Item = Node<'a>>) -> impl Iterator<Item = (String, Node<'a>)> {
    buckets.filter_map(|b| b.get("key_as_string").text().map(|t| (t, b)))
}

fn p95(bucket: Node<'_>) -> f64 {
    round2(bucket.at(&[names::P95_DURATION, "values", P95_KEY]).number())
}

fn avg(bucket: Node<'_>) -> f64 {
    round2(bucket.at(&[names::AVG_DURATION, "value"]).number())
}

// ---- per-kind parsers ----

pub fn event_type_breakdown(root: Node<'_>, _opts: &KpiOptions) -> KpiValue {
    KpiValue::LabeledCounts(labeled_counts(agg(root, names::BY_EVENT_TYPE).buckets()))
}

pub fn events_per_hour(root: Node<'_>, _opts: &KpiOptions) -> KpiValue {
    KpiValue::HourlyCounts(
        timed(agg(root, names::EVENTS_PER_HOUR).buckets())
            .map(|(hour, b)| HourlyCount {
                hour,
                count: b.get("doc_count").count(),
            })
            .collect(),
    )
}

pub fn events_per_hour_by_type(root: Node<'_>, opts: &KpiOptions) -> KpiValue {
    let top_n = opts.top_n.max(1) as usize;
    KpiValue::HourlyStacked(
        timed(agg(root, names::EVENTS_PER_HOUR).buckets())
            .map(|(hour, b)| HourlyStacked {
                hour,
                total: b.get("doc_count").count(),
                series: collapse_top_n(labeled_counts(b.get(names::BY_TYPE).buckets()), top_n),
            })
            .collect(),
    )
}

pub fn error_rate_per_hour(root: Node<'_>, _opts: &KpiOptions) -> KpiValue {
    KpiValue::HourlyErrorRates(
        timed(agg(root, names::ERRORS_PER_HOUR).buckets())
            .map(|(hour, b)| {
                let total = b.get("doc_count").count();
                let errors = b.at(&[names::ERRORS_ONLY, "doc_count"]).count();
                HourlyErrorRate {
                    hour,
                    total,
                    errors,
                    error_rate: rate(errors, total),
                }
            })
            .collect(),
    )
}

pub fn duration_stats_per_hour(root: Node<'_>, _opts: &KpiOptions) -> KpiValue {
    KpiValue::HourlyDurationStats(
        timed(agg(root, names::DURATION_PER_HOUR).buckets())
            .map(|(hour, b)| HourlyDurationStats {
                hour,
                avg_duration_ms: avg(b),
                p95_duration_ms: p95(b),
            })
            .collect(),
    )
}

pub fn success_rate(root: Node<'_>, _opts: &KpiOptions) -> KpiValue {
    let total = root.at(&["hits", "total", "value"]).count();
    let success = agg(root, names::SUCCESSFUL_EVENTS).get("doc_count").count();
    KpiValue::SuccessRate(SuccessRate {
        total,
        success,
        success_rate: rate(success, total),
    })
}

pub fn top_actors(root: Node<'_>, _opts: &KpiOptions) -> KpiValue {
    KpiValue::Ranked(ranked(agg(root, names::TOP_ACTORS).buckets()))
}

pub fn site_volume_and_success(root: Node<'_>, _opts: &KpiOptions) -> KpiValue {
    KpiValue::SiteVolumeSuccess(
        agg(root, names::BY_SITE)
            .buckets()
            .filter_map(|b| {
                let site_id = b.get("key").text()?;
                let total = b.get("doc_count").count();
                let success = b.at(&[names::SUCCESS_ONLY, "doc_count"]).count();
                Some(SiteVolumeSuccess {
                    site_id,
                    total,
                    success,
                    success_rate: rate(success, total),
                })
            })
            .collect(),
    )
}

fn hourly_unique(root: Node<'_>, sub_agg: &str) -> KpiValue {
    KpiValue::HourlyUniqueCounts(
        timed(agg(root, names::PER_HOUR).buckets())
            .map(|(hour, b)| HourlyUniqueCount {
                hour,
                unique: b.at(&[sub_agg, "value"]).count(),
            })
            .collect(),
    )
}

pub fn unique_actors_per_hour(root: Node<'_>, _opts: &KpiOptions) -> KpiValue {
    hourly_unique(root, names::UNIQUE_ACTORS)
}

pub fn unique_sessions_per_hour(root: Node<'_>, _opts: &KpiOptions) -> KpiValue {
    hourly_unique(root, names::UNIQUE_SESSIONS)
}

pub fn success_rate_by_event_type(root: Node<'_>, _opts: &KpiOptions) -> KpiValue {
    KpiValue::EventTypeSuccess(
        agg(root, names::BY_TYPE)
            .buckets()
            .filter_map(|b| {
                let event_type = b.get("key").text()?;
                let total = b.get("doc_count").count();
                let success = b.at(&[names::SUCCESS_ONLY, "doc_count"]).count();
                Some(EventTypeSuccess {
                    event_type,
                    total,
                    success,
                    success_rate: rate(success, total),
                })
            })
            .collect(),
    )
}

pub fn duration_stats_by_event_type(root: Node<'_>, _opts: &KpiOptions) -> KpiValue {
    KpiValue::EventTypeDurationStats(
        agg(root, names::BY_TYPE)
            .buckets()
            .filter_map(|b| {
                Some(EventTypeDurationStats {
                    event_type: b.get("key").text()?,
                    avg_duration_ms: avg(b),
                    p95_duration_ms: p95(b),
                })
            })
            .collect(),
    )
}

pub fn top_sessions_by_event_count(root: Node<'_>, _opts: &KpiOptions) -> KpiValue {
    KpiValue::Ranked(ranked(agg(root, names::TOP_SESSIONS).buckets()))
}

pub fn top_event_types(root: Node<'_>, _opts: &KpiOptions) -> KpiValue {
    KpiValue::Ranked(ranked(agg(root, names::TOP_EVENT_TYPES).buckets()))
}

pub fn throughput_per_minute(root: Node<'_>, _opts: &KpiOptions) -> KpiValue {
    KpiValue::MinuteCounts(
        timed(agg(root, names::PER_MINUTE).buckets())
            .map(|(minute, b)| MinuteCount {
                minute,
                count: b.get("doc_count").count(),
            })
            .collect(),
    )
}

pub fn error_types_breakdown(root: Node<'_>, _opts: &KpiOptions) -> KpiValue {
    KpiValue::LabeledCounts(labeled_counts(
        agg(root, names::FAILED_EVENTS).get(names::BY_TYPE).buckets(),
    ))
}

pub fn actor_activity_summary(root: Node<'_>, _opts: &KpiOptions) -> KpiValue {
    KpiValue::ActorActivity(
        agg(root, names::BY_ACTOR)
            .buckets()
            .filter_map(|b| {
                let actor_id = b.get("key").text()?;
                let total = b.get("doc_count").count();
                let success = b.at(&[names::SUCCESS_ONLY, "doc_count"]).count();
                Some(ActorActivity {
                    actor_id,
                    total,
                    success,
                    success_rate: rate(success, total),
                    unique_sessions: b.at(&[names::UNIQUE_SESSIONS, "value"]).count(),
                    avg_duration_ms: avg(b),
                })
            })
            .collect(),
    )
}

pub fn top_longest_events(root: Node<'_>, opts: &KpiOptions) -> KpiValue {
    KpiValue::LongestEvents(
        root.at(&["hits", "hits"])
            .items()
            .filter(|hit| hit.get("_source").is_present())
            .filter_map(|hit| {
                let source = hit.get("_source");
                Some(LongestEvent {
                    id: hit.get("_id").text()?,
                    timestamp: source.get(fields::TIMESTAMP).text().unwrap_or_default(),
                    event_type: source.get(fields::EVENT_TYPE).text().unwrap_or_default(),
                    session_id: source.get(fields::SESSION_ID).text().unwrap_or_default(),
                    actor_id: source.get(fields::ACTOR_ID).text().unwrap_or_default(),
                    site_id: source.get(fields::SITE_ID).text().unwrap_or_default(),
                    duration_ms: source.get(fields::DURATION_MS).count(),
                    success: source.get(fields::SUCCESS).flag(),
                })
            })
            .take(opts.limit as usize)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::plan::{DEFAULT_LIMIT, DEFAULT_TOP_N};
    use serde_json::json;

    fn opts() -> KpiOptions {
        KpiOptions {
            top_n: DEFAULT_TOP_N,
            limit: DEFAULT_LIMIT,
        }
    }

    fn parse_json(kind: KpiKind, body: Value) -> KpiValue {
        parse(kind, &body.to_string(), &opts()).unwrap()
    }

    fn slices(pairs: &[(&str, u64)]) -> Vec<LabeledCount> {
        pairs
            .iter()
            .map(|(label, count)| LabeledCount::new(*label, *count))
            .collect()
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(75.0), 75.0);
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(66.666666), 66.67);
        assert_eq!(round2(0.125), 0.13);
    }

    #[test]
    fn test_round2_is_idempotent() {
        for x in [0.0, 0.004, 0.005, 1.0 / 3.0, 2.0 / 3.0, 12.345, 99.995, 1234.5678] {
            assert_eq!(round2(round2(x)), round2(x), "x = {x}");
        }
    }

    #[test]
    fn test_rate_with_zero_total_is_zero() {
        assert_eq!(rate(0, 0), 0.0);
        assert_eq!(rate(17, 0), 0.0);
        assert_eq!(rate(1, 3), 33.33);
        assert_eq!(rate(150, 200), 75.0);
    }

    #[test]
    fn test_collapse_folds_remainder_into_other() {
        let out = collapse_top_n(slices(&[("A", 10), ("B", 7), ("C", 3), ("D", 1)]), 2);
        assert_eq!(out, slices(&[("A", 10), ("B", 7), ("OTHER", 4)]));
    }

    #[test]
    fn test_collapse_without_overflow_has_no_other() {
        let input = slices(&[("A", 10), ("B", 7)]);
        assert_eq!(collapse_top_n(input.clone(), 2), input);
        assert_eq!(collapse_top_n(input.clone(), 25), input);
    }

    #[test]
    fn test_collapse_sorts_and_keeps_tie_order() {
        let out = collapse_top_n(slices(&[("A", 1), ("B", 5), ("C", 5), ("D", 0)]), 2);
        assert_eq!(out, slices(&[("B", 5), ("C", 5), ("OTHER", 1)]));
    }

    #[test]
    fn test_collapse_skips_zero_remainder() {
        let out = collapse_top_n(slices(&[("A", 4), ("B", 0)]), 1);
        assert_eq!(out, slices(&[("A", 4)]));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = parse(KpiKind::EventsPerHour, "<html>502</html>", &opts()).unwrap_err();
        assert!(matches!(err, KpiError::MalformedResponse(_)));
    }

    #[test]
    fn test_non_object_document_is_malformed() {
        let err = parse(KpiKind::EventsPerHour, "[1, 2, 3]", &opts()).unwrap_err();
        assert!(matches!(err, KpiError::MalformedResponse(_)));
    }

    #[test]
    fn test_missing_aggregations_read_as_empty() {
        for kind in KpiKind::ALL {
            let value = parse_json(kind, json!({ "took": 3 }));
            match value {
                KpiValue::SuccessRate(summary) => {
                    assert_eq!(summary.total, 0);
                    assert_eq!(summary.success_rate, 0.0);
                }
                other => assert_eq!(other.row_count(), 0, "{kind}"),
            }
        }
    }

    #[test]
    fn test_null_keys_are_dropped() {
        let value = parse_json(
            KpiKind::EventTypeBreakdown,
            json!({ "aggregations": { "by_event_type": { "buckets": [
                { "key": "SCAN", "doc_count": 120 },
                { "key": null, "doc_count": 9 },
                { "doc_count": 4 },
                { "key": "PICK", "doc_count": 80 }
            ]}}}),
        );
        assert_eq!(value, KpiValue::LabeledCounts(slices(&[("SCAN", 120), ("PICK", 80)])));
    }

    #[test]
    fn test_hourly_buckets_without_time_key_dropped() {
        let value = parse_json(
            KpiKind::EventsPerHour,
            json!({ "aggregations": { "events_per_hour": { "buckets": [
                { "key_as_string": "2024-01-01T00:00:00.000Z", "key": 1704067200000u64, "doc_count": 3 },
                { "key": 1704070800000u64, "doc_count": 5 },
                { "key_as_string": "2024-01-01T02:00:00.000Z", "key": 1704074400000u64, "doc_count": 0 }
            ]}}}),
        );
        assert_eq!(
            value,
            KpiValue::HourlyCounts(vec![
                HourlyCount { hour: "2024-01-01T00:00:00.000Z".into(), count: 3 },
                HourlyCount { hour: "2024-01-01T02:00:00.000Z".into(), count: 0 },
            ])
        );
    }

    #[test]
    fn test_error_rate_per_hour() {
        let value = parse_json(
            KpiKind::ErrorRatePerHour,
            json!({ "aggregations": { "errors_per_hour": { "buckets": [
                { "key_as_string": "h1", "doc_count": 3, "errors_only": { "doc_count": 1 } },
                { "key_as_string": "h2", "doc_count": 0, "errors_only": { "doc_count": 0 } },
                { "key_as_string": "h3", "doc_count": 8 }
            ]}}}),
        );
        assert_eq!(
            value,
            KpiValue::HourlyErrorRates(vec![
                HourlyErrorRate { hour: "h1".into(), total: 3, errors: 1, error_rate: 33.33 },
                HourlyErrorRate { hour: "h2".into(), total: 0, errors: 0, error_rate: 0.0 },
                HourlyErrorRate { hour: "h3".into(), total: 8, errors: 0, error_rate: 0.0 },
            ])
        );
    }

    #[test]
    fn test_duration_stats_missing_percentile_is_zero() {
        let value = parse_json(
            KpiKind::DurationStatsPerHour,
            json!({ "aggregations": { "duration_per_hour": { "buckets": [
                { "key_as_string": "h1", "doc_count": 2,
                  "avg_duration": { "value": 1234.5678 },
                  "p95_duration": { "values": { "95.0": 2000.129 } } },
                { "key_as_string": "h2", "doc_count": 0,
                  "avg_duration": { "value": null },
                  "p95_duration": { "values": { "95.0": null } } },
                { "key_as_string": "h3", "doc_count": 1,
                  "avg_duration": { "value": 10.0 },
                  "p95_duration": { "values": {} } }
            ]}}}),
        );
        assert_eq!(
            value,
            KpiValue::HourlyDurationStats(vec![
                HourlyDurationStats { hour: "h1".into(), avg_duration_ms: 1234.57, p95_duration_ms: 2000.13 },
                HourlyDurationStats { hour: "h2".into(), avg_duration_ms: 0.0, p95_duration_ms: 0.0 },
                HourlyDurationStats { hour: "h3".into(), avg_duration_ms: 10.0, p95_duration_ms: 0.0 },
            ])
        );
    }

    #[test]
    fn test_stacked_by_type_collapses_each_hour() {
        let body = json!({ "aggregations": { "events_per_hour": { "buckets": [
            { "key_as_string": "h1", "doc_count": 10, "by_type": { "buckets": [
                { "key": "X", "doc_count": 5 },
                { "key": "Y", "doc_count": 3 },
                { "key": "Z", "doc_count": 2 }
            ]}},
            { "key_as_string": "h2", "doc_count": 0, "by_type": { "buckets": [] } }
        ]}}});
        let value = parse(
            KpiKind::EventsPerHourByType,
            &body.to_string(),
            &KpiOptions { top_n: 1, limit: DEFAULT_LIMIT },
        )
        .unwrap();

        assert_eq!(
            value,
            KpiValue::HourlyStacked(vec![
                HourlyStacked { hour: "h1".into(), total: 10, series: slices(&[("X", 5), ("OTHER", 5)]) },
                HourlyStacked { hour: "h2".into(), total: 0, series: vec![] },
            ])
        );
    }

    #[test]
    fn test_site_volume_and_success() {
        let value = parse_json(
            KpiKind::SiteVolumeAndSuccess,
            json!({ "aggregations": { "by_site": { "buckets": [
                { "key": "site-1", "doc_count": 4, "success_only": { "doc_count": 3 } },
                { "key": "site-2", "doc_count": 2 }
            ]}}}),
        );
        assert_eq!(
            value,
            KpiValue::SiteVolumeSuccess(vec![
                SiteVolumeSuccess { site_id: "site-1".into(), total: 4, success: 3, success_rate: 75.0 },
                SiteVolumeSuccess { site_id: "site-2".into(), total: 2, success: 0, success_rate: 0.0 },
            ])
        );
    }

    #[test]
    fn test_unique_sessions_reads_cardinality() {
        let value = parse_json(
            KpiKind::UniqueSessionsPerHour,
            json!({ "aggregations": { "per_hour": { "buckets": [
                { "key_as_string": "h1", "doc_count": 9, "unique_sessions": { "value": 4 } },
                { "key_as_string": "h2", "doc_count": 0 }
            ]}}}),
        );
        assert_eq!(
            value,
            KpiValue::HourlyUniqueCounts(vec![
                HourlyUniqueCount { hour: "h1".into(), unique: 4 },
                HourlyUniqueCount { hour: "h2".into(), unique: 0 },
            ])
        );
    }

    #[test]
    fn test_error_types_breakdown_reads_nested_terms() {
        let value = parse_json(
            KpiKind::ErrorTypesBreakdown,
            json!({ "aggregations": { "failed_events": { "doc_count": 6, "by_type": { "buckets": [
                { "key": "PICK", "doc_count": 4 },
                { "key": "PACK", "doc_count": 2 }
            ]}}}}),
        );
        assert_eq!(value, KpiValue::LabeledCounts(slices(&[("PICK", 4), ("PACK", 2)])));
    }

    #[test]
    fn test_success_rate_by_event_type() {
        let value = parse_json(
            KpiKind::SuccessRateByEventType,
            json!({ "aggregations": { "by_type": { "buckets": [
                { "key": "SCAN", "doc_count": 3, "success_only": { "doc_count": 2 } },
                { "key": "PICK", "doc_count": 0, "success_only": { "doc_count": 0 } },
                { "key": null, "doc_count": 5, "success_only": { "doc_count": 5 } }
            ]}}}),
        );
        assert_eq!(
            value,
            KpiValue::EventTypeSuccess(vec![
                EventTypeSuccess { event_type: "SCAN".into(), total: 3, success: 2, success_rate: 66.67 },
                EventTypeSuccess { event_type: "PICK".into(), total: 0, success: 0, success_rate: 0.0 },
            ])
        );
    }

    #[test]
    fn test_duration_stats_by_event_type() {
        let value = parse_json(
            KpiKind::DurationStatsByEventType,
            json!({ "aggregations": { "by_type": { "buckets": [
                { "key": "PACK", "doc_count": 4,
                  "avg_duration": { "value": 812.346 },
                  "p95_duration": { "values": { "95.0": 1500.0 } } },
                { "key": "SCAN", "doc_count": 1,
                  "avg_duration": { "value": 20.0 },
                  "p95_duration": { "values": { "95.0": null } } }
            ]}}}),
        );
        assert_eq!(
            value,
            KpiValue::EventTypeDurationStats(vec![
                EventTypeDurationStats { event_type: "PACK".into(), avg_duration_ms: 812.35, p95_duration_ms: 1500.0 },
                EventTypeDurationStats { event_type: "SCAN".into(), avg_duration_ms: 20.0, p95_duration_ms: 0.0 },
            ])
        );
    }

    #[test]
    fn test_ranked_kinds_read_their_own_aggregation() {
        let cases = [
            (KpiKind::TopActors, "top_actors"),
            (KpiKind::TopSessionsByEventCount, "top_sessions"),
            (KpiKind::TopEventTypes, "top_event_types"),
        ];
        for (kind, agg_name) in cases {
            let body = json!({ "aggregations": { agg_name: { "buckets": [
                { "key": "first", "doc_count": 42 },
                { "key": "second", "doc_count": 17 }
            ]}}});
            assert_eq!(
                parse_json(kind, body),
                KpiValue::Ranked(vec![
                    RankedEntry { key: "first".into(), count: 42 },
                    RankedEntry { key: "second".into(), count: 17 },
                ]),
                "{kind}"
            );
        }
    }

    #[test]
    fn test_ranked_numeric_keys_become_text() {
        let value = parse_json(
            KpiKind::TopActors,
            json!({ "aggregations": { "top_actors": { "buckets": [
                { "key": 1007, "doc_count": 9 }
            ]}}}),
        );
        assert_eq!(
            value,
            KpiValue::Ranked(vec![RankedEntry { key: "1007".into(), count: 9 }])
        );
    }

    #[test]
    fn test_unique_actors_reads_cardinality() {
        let value = parse_json(
            KpiKind::UniqueActorsPerHour,
            json!({ "aggregations": { "per_hour": { "buckets": [
                { "key_as_string": "h1", "doc_count": 12, "unique_actors": { "value": 3 } },
                { "key_as_string": "h2", "doc_count": 1, "unique_sessions": { "value": 7 } }
            ]}}}),
        );
        assert_eq!(
            value,
            KpiValue::HourlyUniqueCounts(vec![
                HourlyUniqueCount { hour: "h1".into(), unique: 3 },
                HourlyUniqueCount { hour: "h2".into(), unique: 0 },
            ])
        );
    }

    #[test]
    fn test_throughput_per_minute_keeps_empty_minutes() {
        let value = parse_json(
            KpiKind::ThroughputPerMinute,
            json!({ "aggregations": { "per_minute": { "buckets": [
                { "key_as_string": "2024-01-01T00:00:00.000Z", "doc_count": 6 },
                { "key_as_string": "2024-01-01T00:01:00.000Z", "doc_count": 0 },
                { "key_as_string": "2024-01-01T00:02:00.000Z", "doc_count": 2 }
            ]}}}),
        );
        assert_eq!(
            value,
            KpiValue::MinuteCounts(vec![
                MinuteCount { minute: "2024-01-01T00:00:00.000Z".into(), count: 6 },
                MinuteCount { minute: "2024-01-01T00:01:00.000Z".into(), count: 0 },
                MinuteCount { minute: "2024-01-01T00:02:00.000Z".into(), count: 2 },
            ])
        );
    }

    #[test]
    fn test_actor_activity_summary() {
        let value = parse_json(
            KpiKind::ActorActivitySummary,
            json!({ "aggregations": { "by_actor": { "buckets": [
                { "key": "picker-1", "doc_count": 8,
                  "success_only": { "doc_count": 6 },
                  "unique_sessions": { "value": 2 },
                  "avg_duration": { "value": 101.456 } }
            ]}}}),
        );
        assert_eq!(
            value,
            KpiValue::ActorActivity(vec![ActorActivity {
                actor_id: "picker-1".into(),
                total: 8,
                success: 6,
                success_rate: 75.0,
                unique_sessions: 2,
                avg_duration_ms: 101.46,
            }])
        );
    }

    #[test]
    fn test_top_longest_events_reads_hits() {
        let value = parse_json(
            KpiKind::TopLongestEvents,
            json!({ "hits": { "total": { "value": 2 }, "hits": [
                { "_id": "e1", "_source": {
                    "timestamp": "2024-01-01T03:00:00Z", "eventType": "PACK", "sessionId": "s1",
                    "actorId": "a1", "siteId": "site-7", "durationMs": 9000, "success": false } },
                { "_source": { "eventType": "SCAN" } },
                { "_id": "e3", "_source": null }
            ]}}),
        );
        assert_eq!(
            value,
            KpiValue::LongestEvents(vec![LongestEvent {
                id: "e1".into(),
                timestamp: "2024-01-01T03:00:00Z".into(),
                event_type: "PACK".into(),
                session_id: "s1".into(),
                actor_id: "a1".into(),
                site_id: "site-7".into(),
                duration_ms: 9000,
                success: false,
            }])
        );
    }

    #[test]
    fn test_node_numeric_leniency() {
        let doc = json!({ "a": "12", "b": 3.9, "c": -4, "d": "x", "e": [1] });
        let root = Node::new(&doc);
        assert_eq!(root.get("a").count(), 12);
        assert_eq!(root.get("b").count(), 3);
        assert_eq!(root.get("c").count(), 0);
        assert_eq!(root.get("d").number(), 0.0);
        assert_eq!(root.get("e").count(), 0);
        assert_eq!(root.at(&["missing", "deeper"]).number(), 0.0);
        assert!(!root.get("missing").is_present());
        assert_eq!(root.get("b").text().as_deref(), Some("3.9"));
    }
}
