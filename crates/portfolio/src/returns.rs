use crate::error::PortfolioError;
use core_types::{CoreError, ReturnSeries, ValueSeries};
use rust_decimal::prelude::ToPrimitive;

/// Derives the daily simple-return series from a value series:
/// r_t = V_t / V_{t-1} - 1, for t > 0.
///
/// Simple (arithmetic) returns, not log returns; the metric definitions
/// downstream all assume the arithmetic convention. A series shorter than
/// two observations cannot produce a single return and is reported as an
/// error rather than silently zero-filled.
pub fn daily_returns(series: &ValueSeries) -> Result<ReturnSeries, PortfolioError> {
    if series.len() < 2 {
        return Err(PortfolioError::NotEnoughObservations {
            got: series.len(),
            need: 2,
        });
    }

    let values = series.values();
    let mut returns = Vec::with_capacity(values.len() - 1);
    for pair in values.windows(2) {
        // Division happens in Decimal so 110/100 comes out as exactly 0.1
        // before the cast to f64.
        let r = (pair[1] - pair[0]) / pair[0];
        let r = r.to_f64().ok_or_else(|| {
            CoreError::Calculation(format!("return {} not representable as f64", r))
        })?;
        returns.push(r);
    }

    let dates = series.dates()[1..].to_vec();
    ReturnSeries::new(dates, returns).map_err(PortfolioError::from)
}
