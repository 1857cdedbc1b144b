//! Request Normalizer - validates and clamps raw KPI requests.
//!
//! This is the only guard between callers and the analytics store, so
//! every request passes through here before dispatch.

use chrono::{DateTime, Duration, Utc};

use crate::config::LimitsConfig;
use crate::domain::{KpiRequest, RawKpiRequest};
use crate::error::{KpiError, KpiResult};

/// Turns raw caller input into a canonical [`KpiRequest`].
#[derive(Debug, Clone)]
pub struct RequestNormalizer {
    limits: LimitsConfig,
    max_window: Duration,
}

impl RequestNormalizer {
    /// Fails with [`KpiError::Config`] when `max_window_days` is not a usable day count.
    pub fn new(limits: LimitsConfig) -> KpiResult<Self> {
        let max_window = Some(limits.max_window_days)
            .filter(|days| *days >= 1)
            .and_then(Duration::try_days)
            .ok_or_else(|| {
                KpiError::Config(format!(
                    "limits.max_window_days must be a positive day count, got {}",
                    limits.max_window_days
                ))
            })?;

        Ok(Self { limits, max_window })
    }

    /// Validate the window and clamp the optional parameters.
    ///
    /// Fails with [`KpiError::InvalidRequest`] when `from`/`to` are missing
    /// or unparseable, when `from` is after `to`, or when the window is
    /// longer than the configured maximum. Out-of-range `top_n` and `limit`
    /// are clamped, never rejected.
    pub fn normalize(&self, raw: &RawKpiRequest) -> KpiResult<KpiRequest> {
        let from = parse_instant("from", raw.from.as_deref())?;
        let to = parse_instant("to", raw.to.as_deref())?;

        if from > to {
            return Err(KpiError::InvalidRequest(
                "'from' must be before 'to'".to_string(),
            ));
        }

        if to - from > self.max_window {
            return Err(KpiError::InvalidRequest(format!(
                "Time range too large. Max range is {} days",
                self.limits.max_window_days
            )));
        }

        let site_id = raw
            .site_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let top_n = clamp(raw.top_n, self.limits.default_top_n, self.limits.max_top_n);
        let limit = clamp(raw.limit, self.limits.default_limit, self.limits.max_limit);

        Ok(KpiRequest {
            from,
            to,
            site_id,
            top_n: Some(top_n),
            limit: Some(limit),
        })
    }
}

impl Default for RequestNormalizer {
    fn default() -> Self {
        let limits = LimitsConfig::default();
        Self {
            max_window: Duration::days(limits.max_window_days),
            limits,
        }
    }
}

fn parse_instant(field: &str, value: Option<&str>) -> KpiResult<DateTime<Utc>> {
    let value = value.map(str::trim).filter(|v| !v.is_empty()).ok_or_else(|| {
        KpiError::InvalidRequest(format!("'{}' is a required ISO-8601 instant", field))
    })?;

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            KpiError::InvalidRequest(format!(
                "'{}' is not an ISO-8601 instant ({}): {}",
                field, value, e
            ))
        })
}

fn clamp(value: Option<i64>, default: u32, max: u32) -> u32 {
    let max = max.max(1);
    match value {
        None => default.clamp(1, max),
        Some(v) => v.clamp(1, i64::from(max)) as u32,
    }
}
