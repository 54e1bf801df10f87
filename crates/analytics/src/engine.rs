use crate::aligner::align;
use crate::error::AnalyticsError;
use crate::regression::RollingRegression;
use crate::report::PerformanceCharts;
use crate::returns::daily_returns;
use crate::snapshot::MetricSnapshot;
use crate::summary::{SeriesTrimmer, apply_fill, cumulative_sum, fill_policy, summarize};
use crate::zscore::{relative_performance, rolling_zscore};
use configuration::{AnalyticsConfig, CumulativeAlphaScope};
use core_types::{DatedValue, MetricKind, PricePoint};
use tracing::{debug, info};

/// A stateless calculator turning two price histories into the dashboard's
/// four chart series.
///
/// Holds only its parameters; every call recomputes from the inputs.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
}

impl AnalyticsEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// The main entry point for the performance charts.
    ///
    /// # Arguments
    ///
    /// * `target` - Daily closes of the ticker being analysed, in any order.
    /// * `benchmark` - Daily closes of the benchmark, in any order.
    ///
    /// # Returns
    ///
    /// The four summarized series, or `InsufficientData` when the histories do
    /// not support a chart (no common dates, fewer than the minimum points in the
    /// display window, fewer returns than the regression window).
    pub fn calculate(
        &self,
        target: &[PricePoint],
        benchmark: &[PricePoint],
    ) -> Result<PerformanceCharts, AnalyticsError> {
        let aligned = align(target, benchmark)?;
        let Some(latest) = aligned.last().map(|row| row.date) else {
            return Err(AnalyticsError::InsufficientData("no aligned rows".to_string()));
        };
        let trimmer = SeriesTrimmer::new(
            latest,
            self.config.display_days,
            self.config.min_display_points,
        );
        debug!(rows = aligned.len(), %latest, cutoff = %trimmer.cutoff(), "Aligned price histories.");

        // --- Relative performance and z-score, computed on the full history ---
        let relative = apply_fill(
            relative_performance(&aligned),
            fill_policy(MetricKind::RelativePerformance.into()),
        );
        let z_score = rolling_zscore(&relative, self.config.zscore_window);

        let relative = trimmer.trim_checked(relative)?;
        let z_score = trimmer.trim(z_score);

        // --- Rolling alpha ---
        let returns = daily_returns(&aligned)?;
        let fitted = RollingRegression::new(self.config.regression_window)?.fit(&returns)?;
        let alpha_history = apply_fill(
            fitted
                .iter()
                .map(|p| DatedValue::new(p.date, p.alpha))
                .collect(),
            fill_policy(MetricKind::Alpha.into()),
        );
        let alpha = trimmer.trim(alpha_history.clone());
        if alpha.is_empty() {
            return Err(AnalyticsError::InsufficientData(format!(
                "no rolling alpha inside the display window starting {}",
                trimmer.cutoff()
            )));
        }

        let cumulative_alpha = match self.config.cumulative_alpha_scope {
            CumulativeAlphaScope::DisplayWindow => cumulative_sum(&alpha),
            CumulativeAlphaScope::FullHistory => trimmer.trim(cumulative_sum(&alpha_history)),
        };

        info!(
            points = relative.len(),
            alpha_points = alpha.len(),
            "Computed performance charts."
        );

        Ok(PerformanceCharts {
            relative_performance: summarize(&relative, MetricKind::RelativePerformance.format())?,
            moving_z_score: summarize(&z_score, MetricKind::MovingZScore.format())?,
            alpha: summarize(&alpha, MetricKind::Alpha.format())?,
            cumulative_alpha: summarize(&cumulative_alpha, MetricKind::CumulativeAlpha.format())?,
        })
    }

    /// Point-in-time metrics over the configured snapshot window.
    pub fn snapshot(
        &self,
        symbol: &str,
        benchmark: &str,
        target: &[PricePoint],
        benchmark_prices: &[PricePoint],
    ) -> MetricSnapshot {
        MetricSnapshot::compute(symbol, benchmark, target, benchmark_prices, &self.config)
    }
}
