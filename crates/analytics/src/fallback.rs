use crate::report::{MetricSummary, PerformanceCharts};
use crate::summary::cumulative_sum;
use chrono::{Duration, NaiveDate};
use core_types::{DatedValue, MetricKind};
use std::f64::consts::PI;

/// Number of daily points in the synthetic payload, ending today.
pub const FALLBACK_DAYS: i64 = 365;

/// Produces the deterministic synthetic payload served when real data is
/// unavailable.
///
/// Point `i` (0 = 364 days ago, 364 = today) follows:
/// - relative performance `5 * sin(2*pi*i/365)`
/// - z-score `1.5 * cos(2*pi*i/365)`
/// - alpha `0.01 * sin(2*pi*i/180)`
/// - cumulative alpha, the running sum of alpha
///
/// A pure function of the date it is given.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackGenerator;

impl FallbackGenerator {
    pub fn generate(today: NaiveDate) -> PerformanceCharts {
        let start = today - Duration::days(FALLBACK_DAYS - 1);

        let relative = wave(start, |i| 5.0 * (2.0 * PI * i / 365.0).sin());
        let z_score = wave(start, |i| 1.5 * (2.0 * PI * i / 365.0).cos());
        let alpha = wave(start, |i| 0.01 * (2.0 * PI * i / 180.0).sin());
        let cumulative = cumulative_sum(&alpha);

        PerformanceCharts {
            // Already in percent, so only the sign/precision/suffix rule applies.
            relative_performance: MetricSummary::from_series(
                &relative,
                MetricKind::RelativePerformance.format().unscaled(),
            ),
            moving_z_score: MetricSummary::from_series(&z_score, MetricKind::MovingZScore.format()),
            alpha: MetricSummary::from_series(&alpha, MetricKind::Alpha.format()),
            cumulative_alpha: MetricSummary::from_series(
                &cumulative,
                MetricKind::CumulativeAlpha.format(),
            ),
        }
    }
}

fn wave(start: NaiveDate, f: impl Fn(f64) -> f64) -> Vec<DatedValue> {
    (0..FALLBACK_DAYS)
        .map(|i| DatedValue::new(start + Duration::days(i), f(i as f64)))
        .collect()
}
