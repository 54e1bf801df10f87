//! Small numeric helpers shared by the calculators.

/// Arithmetic mean, `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
///
/// `None` with fewer than two values or when the spread is zero up to rounding.
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    if negligible(sum_sq, values) {
        return None;
    }
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// True when a sum of squared deviations is indistinguishable from zero for
/// data of this magnitude. A constant series rarely sums to exactly 0.0 in f64.
pub(crate) fn negligible(sum_sq: f64, values: &[f64]) -> bool {
    let scale = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    sum_sq <= f64::EPSILON * values.len() as f64 * scale * scale
}
