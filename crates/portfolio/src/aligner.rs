use crate::error::PortfolioError;
use chrono::NaiveDate;
use core_types::{PriceMatrix, PriceSeries};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Aligns multiple raw per-symbol price series onto a single common
/// trading-day index.
///
/// The algorithm is row-wise drop: build the union of all dates, then keep
/// only the dates where *every* symbol has a close. Holding a stale price
/// forward would bias the return series, so partial rows are discarded
/// outright.
///
/// Disjoint histories produce an empty matrix. The caller treats that as
/// "no usable data", not as a computation error.
pub fn align(series: &[PriceSeries]) -> Result<PriceMatrix, PortfolioError> {
    if series.is_empty() {
        return Ok(PriceMatrix::empty());
    }

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    for s in series {
        if !seen.insert(s.symbol()) {
            return Err(PortfolioError::DuplicateSymbol(s.symbol().to_string()));
        }
    }

    // 1. Union of all dates across symbols.
    let union: BTreeSet<NaiveDate> = series
        .iter()
        .flat_map(|s| s.dates().iter().copied())
        .collect();

    // 2. Keep only complete rows.
    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut columns: BTreeMap<String, Vec<Decimal>> = series
        .iter()
        .map(|s| (s.symbol().to_string(), Vec::new()))
        .collect();

    for date in union {
        let row: Option<Vec<(&str, Decimal)>> = series
            .iter()
            .map(|s| s.close_on(date).map(|close| (s.symbol(), close)))
            .collect();

        if let Some(row) = row {
            dates.push(date);
            for (symbol, close) in row {
                columns
                    .get_mut(symbol)
                    .expect("column pre-created for every input symbol")
                    .push(close);
            }
        }
    }

    if dates.is_empty() {
        debug!("date intersection is empty, no usable data");
        return Ok(PriceMatrix::empty());
    }

    debug!(rows = dates.len(), symbols = series.len(), "aligned price matrix");
    PriceMatrix::new(dates, columns).map_err(PortfolioError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn series(symbol: &str, points: &[(u32, Decimal)]) -> PriceSeries {
        PriceSeries::new(
            symbol,
            points.iter().map(|(day, _)| d(*day)).collect(),
            points.iter().map(|(_, close)| *close).collect(),
        )
        .unwrap()
    }

    #[test]
    fn drops_rows_with_any_missing_symbol() {
        let a = series("A", &[(1, dec!(100)), (2, dec!(101)), (3, dec!(102))]);
        let b = series("B", &[(1, dec!(50)), (3, dec!(51)), (4, dec!(52))]);

        let matrix = align(&[a, b]).unwrap();

        // Day 2 (missing B) and day 4 (missing A) are dropped.
        assert_eq!(matrix.dates(), &[d(1), d(3)]);
        assert_eq!(matrix.column("A").unwrap(), &[dec!(100), dec!(102)]);
        assert_eq!(matrix.column("B").unwrap(), &[dec!(50), dec!(51)]);
    }

    #[test]
    fn disjoint_histories_yield_empty_matrix() {
        let a = series("A", &[(1, dec!(100)), (2, dec!(101))]);
        let b = series("B", &[(3, dec!(50)), (4, dec!(51))]);

        let matrix = align(&[a, b]).unwrap();
        assert!(matrix.is_empty());
    }

    #[test]
    fn single_series_passes_through_unchanged() {
        let a = series("A", &[(1, dec!(100)), (2, dec!(110)), (3, dec!(121))]);
        let matrix = align(std::slice::from_ref(&a)).unwrap();

        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.column("A").unwrap(), a.closes());
    }

    #[test]
    fn rejects_duplicate_symbols() {
        let a = series("A", &[(1, dec!(100))]);
        let a_again = series("A", &[(1, dec!(99))]);
        assert!(matches!(
            align(&[a, a_again]),
            Err(PortfolioError::DuplicateSymbol(_))
        ));
    }

    #[test]
    fn no_input_yields_empty_matrix() {
        assert!(align(&[]).unwrap().is_empty());
    }
}
