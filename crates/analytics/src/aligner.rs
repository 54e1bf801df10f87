use crate::error::AnalyticsError;
use crate::summary::{SeriesField, fill_policy};
use chrono::NaiveDate;
use core_types::{AlignedRow, PricePoint};
use rust_decimal::prelude::*;
use std::collections::BTreeMap;

/// Inner-joins a target and a benchmark price history on date.
///
/// Inputs may arrive in any order (the provider returns newest first). The
/// result is sorted ascending with unique dates; a date present on only one
/// side is dropped. If a history repeats a date, the later entry wins.
pub fn align(
    target: &[PricePoint],
    benchmark: &[PricePoint],
) -> Result<Vec<AlignedRow>, AnalyticsError> {
    if target.is_empty() || benchmark.is_empty() {
        return Err(AnalyticsError::InsufficientData(format!(
            "empty price history (target: {} points, benchmark: {} points)",
            target.len(),
            benchmark.len()
        )));
    }

    let target_closes = by_date(target);
    let benchmark_closes = by_date(benchmark);

    let rows: Vec<AlignedRow> = target_closes
        .into_iter()
        .filter_map(|(date, price_a)| {
            benchmark_closes.get(&date).map(|&price_b| AlignedRow {
                date,
                price_a,
                price_b,
            })
        })
        .collect();

    if rows.is_empty() {
        return Err(AnalyticsError::InsufficientData(
            "target and benchmark share no trading dates".to_string(),
        ));
    }

    Ok(rows)
}

/// Indexes closes by date, converting to f64 on the way. A close with no f64
/// representation is missing and follows the aligned-price fill policy.
fn by_date(points: &[PricePoint]) -> BTreeMap<NaiveDate, f64> {
    let policy = fill_policy(SeriesField::AlignedPrice);
    points
        .iter()
        .filter_map(|p| {
            let close = policy.admit(p.close.to_f64().unwrap_or(f64::NAN))?;
            Some((p.date, close))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_inner_join_keeps_only_common_dates() {
        let target = vec![
            PricePoint::new(day(4), dec!(10)),
            PricePoint::new(day(1), dec!(11)),
            PricePoint::new(day(3), dec!(12)),
        ];
        let benchmark = vec![
            PricePoint::new(day(3), dec!(100)),
            PricePoint::new(day(2), dec!(101)),
            PricePoint::new(day(4), dec!(102)),
        ];

        let rows = align(&target, &benchmark).unwrap();
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(3), day(4)]);
        assert_eq!(rows[0].price_a, 12.0);
        assert_eq!(rows[0].price_b, 100.0);
        assert_eq!(rows[1].price_a, 10.0);
        assert_eq!(rows[1].price_b, 102.0);
    }

    #[test]
    fn test_output_is_sorted_and_unique() {
        let target = vec![
            PricePoint::new(day(5), dec!(1)),
            PricePoint::new(day(2), dec!(2)),
            PricePoint::new(day(2), dec!(3)),
            PricePoint::new(day(9), dec!(4)),
        ];
        let benchmark = target.clone();

        let rows = align(&target, &benchmark).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.windows(2).all(|w| w[0].date < w[1].date));
        // Last duplicate wins.
        assert_eq!(rows[0].price_a, 3.0);
    }

    #[test]
    fn test_empty_input_is_insufficient() {
        let benchmark = vec![PricePoint::new(day(1), dec!(1))];
        assert!(matches!(
            align(&[], &benchmark),
            Err(AnalyticsError::InsufficientData(_))
        ));
        assert!(matches!(
            align(&benchmark, &[]),
            Err(AnalyticsError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_disjoint_dates_are_insufficient() {
        let target = vec![PricePoint::new(day(1), dec!(1))];
        let benchmark = vec![PricePoint::new(day(2), dec!(1))];
        assert!(matches!(
            align(&target, &benchmark),
            Err(AnalyticsError::InsufficientData(_))
        ));
    }
}
