use core_types::{DatedValue, MetricFormat, MetricKind};
use serde::{Deserialize, Serialize};

/// The externally visible shape of one charted metric.
///
/// `value` and `change` are preformatted because the frontend renders them
/// verbatim; `dates` and `values` are parallel arrays for the chart itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub value: String,
    pub change: String,
    pub dates: Vec<String>,
    pub values: Vec<f64>,
}

impl MetricSummary {
    /// Builds a summary without checking the series length.
    ///
    /// With fewer than two points the change is rendered as zero; use
    /// [`crate::summary::summarize`] when that should be an error instead.
    pub fn from_series(series: &[DatedValue], format: MetricFormat) -> Self {
        let latest = series.last().map_or(0.0, |p| p.value);
        let previous = match series.len() {
            0 | 1 => latest,
            n => series[n - 2].value,
        };

        Self {
            value: format.render(latest),
            change: format.render(latest - previous),
            dates: series
                .iter()
                .map(|p| p.date.format("%Y-%m-%d").to_string())
                .collect(),
            values: series.iter().map(|p| p.value).collect(),
        }
    }
}

/// The full payload of the performance dashboard: one summary per metric.
///
/// Always fully populated. A response is either entirely computed from market
/// data or entirely synthetic, never a mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceCharts {
    pub relative_performance: MetricSummary,
    pub moving_z_score: MetricSummary,
    pub alpha: MetricSummary,
    pub cumulative_alpha: MetricSummary,
}

impl PerformanceCharts {
    pub fn get(&self, kind: MetricKind) -> &MetricSummary {
        match kind {
            MetricKind::RelativePerformance => &self.relative_performance,
            MetricKind::MovingZScore => &self.moving_z_score,
            MetricKind::Alpha => &self.alpha,
            MetricKind::CumulativeAlpha => &self.cumulative_alpha,
        }
    }
}
