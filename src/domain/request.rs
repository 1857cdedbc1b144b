//! KPI request types, before and after normalization.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use utoipa::IntoParams;

/// A KPI request as received from a caller. Nothing is validated yet.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RawKpiRequest {
    /// Window start, ISO-8601 instant.
    pub from: Option<String>,
    /// Window end (inclusive), ISO-8601 instant.
    pub to: Option<String>,
    /// Restrict to a single site.
    pub site_id: Option<String>,
    /// Series kept per hour by stacked KPIs.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub top_n: Option<i64>,
    /// Rows returned by ranked KPIs.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<i64>,
}

/// Optional integer query parameter; an empty value (`topN=`) counts as absent.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected an integer, got '{}'", v))),
    }
}

/// A validated, clamped KPI request.
///
/// `from <= to`, the window is bounded, and `site_id` is either `None`
/// or a trimmed non-empty string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiRequest {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub site_id: Option<String>,
    pub top_n: Option<u32>,
    pub limit: Option<u32>,
}

impl KpiRequest {
    /// Request over `[from, to]` with no site filter and no explicit options.
    pub fn window(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            site_id: None,
            top_n: None,
            limit: None,
        }
    }

    pub fn with_site(mut self, site_id: impl Into<String>) -> Self {
        self.site_id = Some(site_id.into());
        self
    }

    pub fn with_top_n(mut self, top_n: u32) -> Self {
        self.top_n = Some(top_n);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
