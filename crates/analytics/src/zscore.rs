use crate::stats;
use crate::summary::{FillPolicy, apply_fill};
use core_types::{AlignedRow, DatedValue};

/// `price_a / price_b - 1` for every aligned row. No window, no filtering:
/// a zero benchmark price yields a non-finite value that the fill policy handles.
pub fn relative_performance(aligned: &[AlignedRow]) -> Vec<DatedValue> {
    aligned
        .iter()
        .map(|row| DatedValue::new(row.date, row.price_a / row.price_b - 1.0))
        .collect()
}

/// Rolling z-score of `series` over `window` observations.
///
/// The first `window - 1` points use an expanding window so the output always
/// has the same length as the input. Points where the score is undefined
/// (one sample, zero spread, non-finite input) come back as `0.0`; this
/// function never fails and never returns NaN.
pub fn rolling_zscore(series: &[DatedValue], window: usize) -> Vec<DatedValue> {
    let values: Vec<f64> = series.iter().map(|p| p.value).collect();
    let scores = series
        .iter()
        .zip(raw_scores(&values, window))
        .map(|(point, z)| DatedValue::new(point.date, z))
        .collect();

    apply_fill(scores, FillPolicy::ZeroFill)
}

/// Rolling z-scores with `NaN` wherever the score is undefined.
pub(crate) fn raw_scores(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|t| {
            let start = (t + 1).saturating_sub(window);
            let sample: Vec<f64> = values[start..=t]
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .collect();

            match (stats::mean(&sample), stats::sample_std(&sample)) {
                (Some(mean), Some(std)) => (values[t] - mean) / std,
                _ => f64::NAN,
            }
        })
        .collect()
}
