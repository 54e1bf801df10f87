//! Display-window trimming, missing-value policy and summary formatting.
//!
//! The missing-value policy for every field the pipeline produces lives here:
//!
//! | field                | policy      | where it is applied                 |
//! |----------------------|-------------|-------------------------------------|
//! | aligned prices       | `Drop`      | [`crate::aligner::align`] (inner join) |
//! | daily returns        | `Drop`      | [`crate::returns::daily_returns`]   |
//! | relative performance | `ZeroFill`  | before summarizing                  |
//! | z-score              | `ZeroFill`  | [`crate::zscore::rolling_zscore`]   |
//! | alpha                | `ZeroFill`  | before accumulation and summarizing |
//! | cumulative alpha     | `ZeroFill`  | inherits zero-filled alpha          |

use crate::error::AnalyticsError;
use crate::report::MetricSummary;
use chrono::{Duration, NaiveDate};
use core_types::{DatedValue, MetricFormat, MetricKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillPolicy {
    /// Remove the observation entirely.
    Drop,
    /// Keep the date, replace the value with `0.0`.
    ZeroFill,
}

impl FillPolicy {
    /// The value to keep for one observation, or `None` to drop it.
    pub fn admit(self, value: f64) -> Option<f64> {
        match self {
            FillPolicy::Drop => value.is_finite().then_some(value),
            FillPolicy::ZeroFill => Some(if value.is_finite() { value } else { 0.0 }),
        }
    }
}

/// Every series the pipeline derives, for looking up its fill policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesField {
    AlignedPrice,
    DailyReturn,
    Metric(MetricKind),
}

impl From<MetricKind> for SeriesField {
    fn from(kind: MetricKind) -> Self {
        SeriesField::Metric(kind)
    }
}

pub const fn fill_policy(field: SeriesField) -> FillPolicy {
    match field {
        SeriesField::AlignedPrice | SeriesField::DailyReturn => FillPolicy::Drop,
        // Charted series must keep full length.
        SeriesField::Metric(_) => FillPolicy::ZeroFill,
    }
}

/// Applies `policy` to every non-finite value of `series`.
pub fn apply_fill(series: Vec<DatedValue>, policy: FillPolicy) -> Vec<DatedValue> {
    series
        .into_iter()
        .filter_map(|p| policy.admit(p.value).map(|value| DatedValue::new(p.date, value)))
        .collect()
}

/// Restricts series to the calendar window ending on the latest aligned date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesTrimmer {
    cutoff: NaiveDate,
    min_points: usize,
}

impl SeriesTrimmer {
    pub fn new(latest: NaiveDate, display_days: i64, min_points: usize) -> Self {
        Self {
            cutoff: latest - Duration::days(display_days),
            min_points,
        }
    }

    /// The first date kept. Inclusive.
    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    pub fn trim(&self, series: Vec<DatedValue>) -> Vec<DatedValue> {
        series.into_iter().filter(|p| p.date >= self.cutoff).collect()
    }

    /// Like [`trim`](Self::trim) but rejects a window too short to chart.
    pub fn trim_checked(&self, series: Vec<DatedValue>) -> Result<Vec<DatedValue>, AnalyticsError> {
        let trimmed = self.trim(series);
        if trimmed.len() < self.min_points {
            return Err(AnalyticsError::InsufficientData(format!(
                "only {} points since {} (minimum {})",
                trimmed.len(),
                self.cutoff,
                self.min_points
            )));
        }
        Ok(trimmed)
    }
}

/// Running sum of the values, keeping dates.
pub fn cumulative_sum(series: &[DatedValue]) -> Vec<DatedValue> {
    series
        .iter()
        .scan(0.0, |running, p| {
            *running += p.value;
            Some(DatedValue::new(p.date, *running))
        })
        .collect()
}

/// Formats the latest point and the change from the previous point.
///
/// The change is an absolute difference, rendered with the metric's own rule.
pub fn summarize(series: &[DatedValue], format: MetricFormat) -> Result<MetricSummary, AnalyticsError> {
    if series.len() < 2 {
        return Err(AnalyticsError::InsufficientData(format!(
            "a summary needs at least 2 points, got {}",
            series.len()
        )));
    }
    Ok(MetricSummary::from_series(series, format))
}
