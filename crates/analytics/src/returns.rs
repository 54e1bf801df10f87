use crate::error::AnalyticsError;
use crate::summary::{SeriesField, fill_policy};
use core_types::{AlignedRow, ReturnRow};

/// Day-over-day fractional returns, `price[t] / price[t-1] - 1`, for both legs.
///
/// The first aligned row has no predecessor and produces no entry. A return
/// that is undefined on either leg (a zero previous price) goes through the
/// daily-return fill policy, which drops the row.
pub fn daily_returns(aligned: &[AlignedRow]) -> Result<Vec<ReturnRow>, AnalyticsError> {
    if aligned.len() < 2 {
        return Err(AnalyticsError::InsufficientData(format!(
            "need at least 2 aligned prices to compute returns, got {}",
            aligned.len()
        )));
    }

    let policy = fill_policy(SeriesField::DailyReturn);
    Ok(aligned
        .windows(2)
        .filter_map(|w| {
            Some(ReturnRow {
                date: w[1].date,
                return_a: policy.admit(w[1].price_a / w[0].price_a - 1.0)?,
                return_b: policy.admit(w[1].price_b / w[0].price_b - 1.0)?,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rows(prices: &[(f64, f64)]) -> Vec<AlignedRow> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &(a, b))| AlignedRow {
                date: start + chrono::Duration::days(i as i64),
                price_a: a,
                price_b: b,
            })
            .collect()
    }

    #[test]
    fn test_returns_have_length_n_minus_one() {
        let aligned = rows(&[(100.0, 50.0), (110.0, 50.0), (99.0, 55.0), (99.0, 44.0)]);
        let returns = daily_returns(&aligned).unwrap();

        assert_eq!(returns.len(), aligned.len() - 1);
        assert_eq!(returns[0].date, aligned[1].date);
        assert!((returns[0].return_a - 0.1).abs() < 1e-9);
        assert!((returns[0].return_b - 0.0).abs() < 1e-9);
        assert!((returns[1].return_a - (-0.1)).abs() < 1e-9);
        assert!((returns[1].return_b - 0.1).abs() < 1e-9);
        assert!((returns[2].return_b - (-0.2)).abs() < 1e-9);
    }

    #[test]
    fn test_zero_price_rows_are_dropped() {
        let aligned = rows(&[(100.0, 50.0), (0.0, 50.0), (90.0, 50.0), (99.0, 55.0)]);
        let returns = daily_returns(&aligned).unwrap();

        // 0 -> 90 is undefined; 100 -> 0 is a valid -100% return.
        assert_eq!(returns.len(), 2);
        assert_eq!(returns[0].return_a, -1.0);
        assert_eq!(returns[1].date, aligned[3].date);
    }

    #[test]
    fn test_single_point_is_insufficient() {
        let aligned = rows(&[(1.0, 1.0)]);
        assert!(matches!(
            daily_returns(&aligned),
            Err(AnalyticsError::InsufficientData(_))
        ));
    }
}
