use crate::{aligner, regression, returns, stats, zscore};
use configuration::AnalyticsConfig;
use core_types::{PricePoint, ReturnRow};
use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Point-in-time figures for one ticker against its benchmark.
///
/// Every field is optional: a figure that cannot be computed from the data at
/// hand is reported as `None` rather than failing the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub symbol: String,
    pub benchmark: String,
    /// Mean daily excess return over the benchmark (not annualized).
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    /// Latest rolling z-score of the target's close.
    pub z_score: Option<f64>,
    /// Cumulative return of the target minus that of the benchmark, in percent.
    pub relative_performance_pct: Option<f64>,
    pub latest_price: Option<Decimal>,
}

impl MetricSnapshot {
    pub fn compute(
        symbol: &str,
        benchmark: &str,
        target: &[PricePoint],
        benchmark_prices: &[PricePoint],
        config: &AnalyticsConfig,
    ) -> Self {
        let window = config.snapshot_window;
        let tail = tail_returns(target, benchmark_prices, window);
        match &tail {
            None => warn!(
                symbol,
                benchmark,
                "No common returns for alpha, beta and relative performance."
            ),
            Some(rows) if rows.len() < window => warn!(
                symbol,
                benchmark,
                window,
                returns = rows.len(),
                "Shorter history than the snapshot window, using all of it."
            ),
            Some(_) => {}
        }
        let tail = tail.unwrap_or_default();

        let x: Vec<f64> = tail.iter().map(|r| r.return_b).collect();
        let y: Vec<f64> = tail.iter().map(|r| r.return_a).collect();

        let mut closes: Vec<(chrono::NaiveDate, f64)> = target
            .iter()
            .filter_map(|p| p.close.to_f64().map(|c| (p.date, c)))
            .collect();
        closes.sort_by_key(|(date, _)| *date);
        let closes: Vec<f64> = closes.into_iter().map(|(_, c)| c).collect();

        let z_score = latest_zscore(&closes, config.snapshot_zscore_window);
        if z_score.is_none() {
            warn!(symbol, "Z-score unavailable.");
        }

        Self {
            symbol: symbol.to_string(),
            benchmark: benchmark.to_string(),
            alpha: capm_alpha(&tail, config.risk_free_rate),
            beta: regression::ols(&x, &y).map(|(_, beta)| beta),
            z_score,
            relative_performance_pct: cumulative_return_spread(&tail),
            latest_price: None,
        }
    }

    /// A snapshot with every figure missing.
    pub fn unavailable(symbol: &str, benchmark: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            benchmark: benchmark.to_string(),
            alpha: None,
            beta: None,
            z_score: None,
            relative_performance_pct: None,
            latest_price: None,
        }
    }

    pub fn with_latest_price(mut self, latest_price: Option<Decimal>) -> Self {
        self.latest_price = latest_price;
        self
    }
}

/// The last `window` daily returns on the common dates, or all of them when
/// the history is shorter. `None` when there are no common returns at all.
fn tail_returns(
    target: &[PricePoint],
    benchmark: &[PricePoint],
    window: usize,
) -> Option<Vec<ReturnRow>> {
    let aligned = aligner::align(target, benchmark).ok()?;
    let rows = returns::daily_returns(&aligned).ok()?;
    let tail = &rows[rows.len().saturating_sub(window)..];
    (!tail.is_empty()).then(|| tail.to_vec())
}

/// Simplified CAPM alpha: mean daily excess return of the stock minus that of
/// the market. `risk_free_rate` is annual and spread over 252 trading days.
pub fn capm_alpha(returns: &[ReturnRow], risk_free_rate: f64) -> Option<f64> {
    let rf_daily = risk_free_rate / 252.0;
    let stock: Vec<f64> = returns.iter().map(|r| r.return_a - rf_daily).collect();
    let market: Vec<f64> = returns.iter().map(|r| r.return_b - rf_daily).collect();
    Some(stats::mean(&stock)? - stats::mean(&market)?)
}

/// `(prod(1 + r_stock) - 1) - (prod(1 + r_market) - 1)`, in percent.
pub fn cumulative_return_spread(returns: &[ReturnRow]) -> Option<f64> {
    if returns.is_empty() {
        return None;
    }
    let (stock, market) = returns
        .iter()
        .fold((1.0, 1.0), |(s, m), r| (s * (1.0 + r.return_a), m * (1.0 + r.return_b)));
    Some(((stock - 1.0) - (market - 1.0)) * 100.0)
}

/// The most recent rolling z-score of `values`, `None` when there are fewer
/// values than the window or the score is undefined.
pub fn latest_zscore(values: &[f64], window: usize) -> Option<f64> {
    if values.len() < window {
        return None;
    }
    zscore::raw_scores(values, window)
        .last()
        .copied()
        .filter(|z| z.is_finite())
}
