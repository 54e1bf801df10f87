use crate::error::AnalyticsError;
use crate::stats;
use core_types::{AlphaBetaPoint, ReturnRow};

/// Window used when a caller does not choose one.
pub const DEFAULT_WINDOW: usize = 23;

/// Sliding-window ordinary least squares of the target return on the benchmark
/// return plus an intercept.
///
/// Each window is fitted independently from its own `window` observations; the
/// intercept is alpha and the slope is beta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingRegression {
    window: usize,
}

impl Default for RollingRegression {
    fn default() -> Self {
        Self { window: DEFAULT_WINDOW }
    }
}

impl RollingRegression {
    pub fn new(window: usize) -> Result<Self, AnalyticsError> {
        if window < 2 {
            return Err(AnalyticsError::InvalidParameters(format!(
                "regression window must be at least 2, got {}",
                window
            )));
        }
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Fits every full window of `returns`.
    ///
    /// The output starts at index `window - 1` of the input, so its length is
    /// `returns.len() - window + 1`. Windows in which the benchmark did not move
    /// yield `NaN` alpha and beta.
    pub fn fit(&self, returns: &[ReturnRow]) -> Result<Vec<AlphaBetaPoint>, AnalyticsError> {
        if returns.len() < self.window {
            return Err(AnalyticsError::InsufficientData(format!(
                "{} returns is fewer than the regression window of {}",
                returns.len(),
                self.window
            )));
        }

        let x: Vec<f64> = returns.iter().map(|r| r.return_b).collect();
        let y: Vec<f64> = returns.iter().map(|r| r.return_a).collect();

        Ok((self.window - 1..returns.len())
            .map(|end| {
                let start = end + 1 - self.window;
                let (alpha, beta) =
                    ols(&x[start..=end], &y[start..=end]).unwrap_or((f64::NAN, f64::NAN));
                AlphaBetaPoint {
                    date: returns[end].date,
                    alpha,
                    beta,
                }
            })
            .collect())
    }
}

/// Closed-form simple regression `y = alpha + beta * x`.
///
/// Equivalent to solving the 2x2 normal equations for a single regressor with an
/// intercept. Returns `None` for empty input or when `x` has zero variance.
pub fn ols(x: &[f64], y: &[f64]) -> Option<(f64, f64)> {
    let n = x.len().min(y.len());
    let (x, y) = (&x[..n], &y[..n]);

    let mean_x = stats::mean(x)?;
    let mean_y = stats::mean(y)?;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        sxx += dx * dx;
        sxy += dx * (yi - mean_y);
    }

    if stats::negligible(sxx, x) {
        return None;
    }

    let beta = sxy / sxx;
    let alpha = mean_y - beta * mean_x;
    Some((alpha, beta))
}
