//! Aggregation Query Builder - compiles KPI requests into store queries.
//!
//! Queries are assembled as a small typed AST ([`SearchBody`], [`Filter`],
//! [`AggNode`]) and only turned into JSON at the edge, so string values are
//! always escaped by serde_json.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::domain::{KpiKind, KpiRequest};
use crate::engine::plan::{KpiOptions, KpiPlan};

/// Document fields queried by the engine.
pub mod fields {
    pub const TIMESTAMP: &str = "timestamp";
    pub const EVENT_TYPE: &str = "eventType";
    pub const SESSION_ID: &str = "sessionId";
    pub const ACTOR_ID: &str = "actorId";
    pub const SITE_ID: &str = "siteId";
    pub const DURATION_MS: &str = "durationMs";
    pub const SUCCESS: &str = "success";
}

/// Aggregation names shared by the builder and the parser.
pub mod names {
    pub const BY_EVENT_TYPE: &str = "by_event_type";
    pub const EVENTS_PER_HOUR: &str = "events_per_hour";
    pub const BY_TYPE: &str = "by_type";
    pub const ERRORS_PER_HOUR: &str = "errors_per_hour";
    pub const ERRORS_ONLY: &str = "errors_only";
    pub const DURATION_PER_HOUR: &str = "duration_per_hour";
    pub const AVG_DURATION: &str = "avg_duration";
    pub const P95_DURATION: &str = "p95_duration";
    pub const SUCCESSFUL_EVENTS: &str = "successful_events";
    pub const TOP_ACTORS: &str = "top_actors";
    pub const BY_SITE: &str = "by_site";
    pub const SUCCESS_ONLY: &str = "success_only";
    pub const PER_HOUR: &str = "per_hour";
    pub const UNIQUE_ACTORS: &str = "unique_actors";
    pub const UNIQUE_SESSIONS: &str = "unique_sessions";
    pub const TOP_SESSIONS: &str = "top_sessions";
    pub const TOP_EVENT_TYPES: &str = "top_event_types";
    pub const PER_MINUTE: &str = "per_minute";
    pub const FAILED_EVENTS: &str = "failed_events";
    pub const BY_ACTOR: &str = "by_actor";
}

/// Bucket cap for event-type groupings.
const EVENT_TYPE_BUCKETS: u32 = 25;
/// Bucket cap for site and actor groupings.
const WIDE_BUCKETS: u32 = 50;

const HOUR: &str = "1h";
const MINUTE: &str = "1m";

/// A filter clause inside `query.bool.filter`, or the body of a filter aggregation.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Inclusive range on a date field.
    Range {
        field: &'static str,
        gte: DateTime<Utc>,
        lte: DateTime<Utc>,
    },
    /// Exact match.
    Term { field: &'static str, value: Value },
    /// Field has a value.
    Exists { field: &'static str },
}

impl Filter {
    pub fn term(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::Term {
            field,
            value: value.into(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Filter::Range { field, gte, lte } => json!({
                "range": { *field: { "gte": format_instant(gte), "lte": format_instant(lte) } }
            }),
            Filter::Term { field, value } => json!({ "term": { *field: value } }),
            Filter::Exists { field } => json!({ "exists": { "field": field } }),
        }
    }
}

/// One aggregation operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    /// Group by distinct values, largest groups first.
    Terms { field: &'static str, size: u32 },
    /// Fixed-width time buckets. Empty buckets are kept.
    DateHistogram {
        field: &'static str,
        interval: &'static str,
    },
    /// Single bucket of matching documents.
    Filter(Filter),
    Cardinality { field: &'static str },
    Avg { field: &'static str },
    Percentiles {
        field: &'static str,
        percents: &'static [u32],
    },
}

impl Aggregation {
    fn to_json(&self) -> Value {
        match self {
            Aggregation::Terms { field, size } => json!({
                "terms": { "field": field, "size": size, "order": { "_count": "desc" } }
            }),
            Aggregation::DateHistogram { field, interval } => json!({
                "date_histogram": { "field": field, "fixed_interval": interval, "min_doc_count": 0 }
            }),
            Aggregation::Filter(filter) => json!({ "filter": filter.to_json() }),
            Aggregation::Cardinality { field } => json!({ "cardinality": { "field": field } }),
            Aggregation::Avg { field } => json!({ "avg": { "field": field } }),
            Aggregation::Percentiles { field, percents } => json!({
                "percentiles": { "field": field, "percents": percents }
            }),
        }
    }
}

/// A named aggregation with optional nested sub-aggregations.
#[derive(Debug, Clone, PartialEq)]
pub struct AggNode {
    pub name: &'static str,
    pub aggregation: Aggregation,
    pub children: Vec<AggNode>,
}

impl AggNode {
    pub fn new(name: &'static str, aggregation: Aggregation) -> Self {
        Self {
            name,
            aggregation,
            children: Vec::new(),
        }
    }

    pub fn with(mut self, child: AggNode) -> Self {
        self.children.push(child);
        self
    }
}

fn aggs_to_json(nodes: &[AggNode]) -> Value {
    let mut out = Map::new();
    for node in nodes {
        let mut body = node.aggregation.to_json();
        if !node.children.is_empty() {
            body["aggs"] = aggs_to_json(&node.children);
        }
        out.insert(node.name.to_string(), body);
    }
    Value::Object(out)
}

/// A complete `_search` request body.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchBody {
    /// Raw documents to return.
    pub size: u32,
    /// Ask the store for an exact hit count.
    pub track_total_hits: bool,
    pub filters: Vec<Filter>,
    /// Field to sort raw hits by, descending.
    pub sort_desc: Option<&'static str>,
    pub aggs: Vec<AggNode>,
}

impl SearchBody {
    /// Zero-document query over the request window, with the site filter when one is set.
    pub fn for_window(request: &KpiRequest) -> Self {
        let mut filters = vec![Filter::Range {
            field: fields::TIMESTAMP,
            gte: request.from,
            lte: request.to,
        }];
        if let Some(site_id) = &request.site_id {
            filters.push(Filter::term(fields::SITE_ID, site_id.as_str()));
        }

        Self {
            size: 0,
            track_total_hits: false,
            filters,
            sort_desc: None,
            aggs: Vec::new(),
        }
    }

    pub fn agg(mut self, node: AggNode) -> Self {
        self.aggs.push(node);
        self
    }

    pub fn to_json(&self) -> Value {
        let filters: Vec<Value> = self.filters.iter().map(Filter::to_json).collect();

        let mut body = Map::new();
        body.insert("size".to_string(), json!(self.size));
        if self.track_total_hits {
            body.insert("track_total_hits".to_string(), json!(true));
        }
        body.insert(
            "query".to_string(),
            json!({ "bool": { "filter": filters } }),
        );
        if let Some(field) = self.sort_desc {
            body.insert(
                "sort".to_string(),
                json!([{ field: { "order": "desc" } }]),
            );
        }
        if !self.aggs.is_empty() {
            body.insert("aggs".to_string(), aggs_to_json(&self.aggs));
        }
        Value::Object(body)
    }
}

/// Compile a KPI request into the JSON body sent to the store.
///
/// Pure: the same kind and request always produce the same document.
pub fn build(kind: KpiKind, request: &KpiRequest) -> Value {
    let plan = KpiPlan::for_kind(kind);
    (plan.build)(request, &plan.options(request)).to_json()
}

fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn hourly(name: &'static str) -> AggNode {
    AggNode::new(
        name,
        Aggregation::DateHistogram {
            field: fields::TIMESTAMP,
            interval: HOUR,
        },
    )
}

fn terms(name: &'static str, field: &'static str, size: u32) -> AggNode {
    AggNode::new(name, Aggregation::Terms { field, size })
}

fn success_filter(name: &'static str, success: bool) -> AggNode {
    AggNode::new(
        name,
        Aggregation::Filter(Filter::term(fields::SUCCESS, success)),
    )
}

fn avg_duration() -> AggNode {
    AggNode::new(
        names::AVG_DURATION,
        Aggregation::Avg {
            field: fields::DURATION_MS,
        },
    )
}

fn p95_duration() -> AggNode {
    AggNode::new(
        names::P95_DURATION,
        Aggregation::Percentiles {
            field: fields::DURATION_MS,
            percents: &[95],
        },
    )
}

fn cardinality(name: &'static str, field: &'static str) -> AggNode {
    AggNode::new(name, Aggregation::Cardinality { field })
}

// ---- per-kind query shapes ----

pub fn event_type_breakdown(request: &KpiRequest, _opts: &KpiOptions) -> SearchBody {
    SearchBody::for_window(request).agg(terms(
        names::BY_EVENT_TYPE,
        fields::EVENT_TYPE,
        EVENT_TYPE_BUCKETS,
    ))
}

pub fn events_per_hour(request: &KpiRequest, _opts: &KpiOptions) -> SearchBody {
    SearchBody::for_window(request).agg(hourly(names::EVENTS_PER_HOUR))
}

pub fn events_per_hour_by_type(request: &KpiRequest, _opts: &KpiOptions) -> SearchBody {
    SearchBody::for_window(request).agg(hourly(names::EVENTS_PER_HOUR).with(terms(
        names::BY_TYPE,
        fields::EVENT_TYPE,
        EVENT_TYPE_BUCKETS,
    )))
}

pub fn error_rate_per_hour(request: &KpiRequest, _opts: &KpiOptions) -> SearchBody {
    SearchBody::for_window(request)
        .agg(hourly(names::ERRORS_PER_HOUR).with(success_filter(names::ERRORS_ONLY, false)))
}

pub fn duration_stats_per_hour(request: &KpiRequest, _opts: &KpiOptions) -> SearchBody {
    SearchBody::for_window(request).agg(
        hourly(names::DURATION_PER_HOUR)
            .with(avg_duration())
            .with(p95_duration()),
    )
}

pub fn success_rate(request: &KpiRequest, _opts: &KpiOptions) -> SearchBody {
    let mut body = SearchBody::for_window(request)
        .agg(success_filter(names::SUCCESSFUL_EVENTS, true));
    body.track_total_hits = true;
    body
}

pub fn top_actors(request: &KpiRequest, opts: &KpiOptions) -> SearchBody {
    SearchBody::for_window(request).agg(terms(names::TOP_ACTORS, fields::ACTOR_ID, opts.limit))
}

pub fn site_volume_and_success(request: &KpiRequest, _opts: &KpiOptions) -> SearchBody {
    SearchBody::for_window(request).agg(
        terms(names::BY_SITE, fields::SITE_ID, WIDE_BUCKETS)
            .with(success_filter(names::SUCCESS_ONLY, true)),
    )
}

pub fn unique_actors_per_hour(request: &KpiRequest, _opts: &KpiOptions) -> SearchBody {
    SearchBody::for_window(request).agg(
        hourly(names::PER_HOUR).with(cardinality(names::UNIQUE_ACTORS, fields::ACTOR_ID)),
    )
}

pub fn unique_sessions_per_hour(request: &KpiRequest, _opts: &KpiOptions) -> SearchBody {
    SearchBody::for_window(request).agg(
        hourly(names::PER_HOUR).with(cardinality(names::UNIQUE_SESSIONS, fields::SESSION_ID)),
    )
}

pub fn success_rate_by_event_type(request: &KpiRequest, _opts: &KpiOptions) -> SearchBody {
    SearchBody::for_window(request).agg(
        terms(names::BY_TYPE, fields::EVENT_TYPE, EVENT_TYPE_BUCKETS)
            .with(success_filter(names::SUCCESS_ONLY, true)),
    )
}

pub fn duration_stats_by_event_type(request: &KpiRequest, _opts: &KpiOptions) -> SearchBody {
    SearchBody::for_window(request).agg(
        terms(names::BY_TYPE, fields::EVENT_TYPE, EVENT_TYPE_BUCKETS)
            .with(avg_duration())
            .with(p95_duration()),
    )
}

pub fn top_sessions_by_event_count(request: &KpiRequest, opts: &KpiOptions) -> SearchBody {
    SearchBody::for_window(request).agg(terms(
        names::TOP_SESSIONS,
        fields::SESSION_ID,
        opts.limit,
    ))
}

pub fn top_event_types(request: &KpiRequest, opts: &KpiOptions) -> SearchBody {
    SearchBody::for_window(request).agg(terms(
        names::TOP_EVENT_TYPES,
        fields::EVENT_TYPE,
        opts.limit,
    ))
}

pub fn throughput_per_minute(request: &KpiRequest, _opts: &KpiOptions) -> SearchBody {
    SearchBody::for_window(request).agg(AggNode::new(
        names::PER_MINUTE,
        Aggregation::DateHistogram {
            field: fields::TIMESTAMP,
            interval: MINUTE,
        },
    ))
}

pub fn error_types_breakdown(request: &KpiRequest, _opts: &KpiOptions) -> SearchBody {
    SearchBody::for_window(request).agg(success_filter(names::FAILED_EVENTS, false).with(
        terms(names::BY_TYPE, fields::EVENT_TYPE, EVENT_TYPE_BUCKETS),
    ))
}

pub fn actor_activity_summary(request: &KpiRequest, _opts: &KpiOptions) -> SearchBody {
    SearchBody::for_window(request).agg(
        terms(names::BY_ACTOR, fields::ACTOR_ID, WIDE_BUCKETS)
            .with(success_filter(names::SUCCESS_ONLY, true))
            .with(cardinality(names::UNIQUE_SESSIONS, fields::SESSION_ID))
            .with(avg_duration()),
    )
}

/// The only shape that returns raw documents: the `limit` longest events.
pub fn top_longest_events(request: &KpiRequest, opts: &KpiOptions) -> SearchBody {
    let mut body = SearchBody::for_window(request);
    body.filters.push(Filter::Exists {
        field: fields::DURATION_MS,
    });
    body.size = opts.limit;
    body.sort_desc = Some(fields::DURATION_MS);
    body
}
