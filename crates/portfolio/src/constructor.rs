use crate::error::PortfolioError;
use core_types::{PriceMatrix, ValueSeries, WeightVector};
use rust_decimal::Decimal;
use tracing::debug;

/// The arbitrary index value of the portfolio at its first trading day:
/// "100 units invested at t0".
pub const BASE_VALUE: Decimal = Decimal::ONE_HUNDRED;

/// Combines an aligned price matrix and a weight vector into a single
/// portfolio value series.
///
/// Each symbol's column is normalized to 1.0 at the first date
/// (price_t / price_0), scaled by its fractional weight, summed across
/// symbols, and rebased to 100. This models buy-and-hold: weights drift with
/// prices after t0 and are never rebalanced. The single-instrument case is
/// just one symbol at weight 1.0.
///
/// The symbol sets of the matrix and the weight vector must match exactly;
/// a mismatch is fatal to this analysis (but only to this one).
pub fn construct(
    matrix: &PriceMatrix,
    weights: &WeightVector,
) -> Result<ValueSeries, PortfolioError> {
    // An empty matrix means no usable data (disjoint histories), which is a
    // different condition from a symbol-set mismatch. Check it first: an
    // empty matrix has no columns at all, so the coverage checks below would
    // misreport it as a missing column.
    if matrix.is_empty() {
        return Err(PortfolioError::NotEnoughObservations { got: 0, need: 1 });
    }
    for symbol in weights.symbols() {
        if matrix.column(symbol).is_none() {
            return Err(PortfolioError::MissingColumn(symbol.to_string()));
        }
    }
    for symbol in matrix.symbols() {
        if weights.percent(symbol).is_none() {
            return Err(PortfolioError::UnweightedColumn(symbol.to_string()));
        }
    }

    let rows = matrix.len();
    let mut values = vec![Decimal::ZERO; rows];

    for symbol in matrix.symbols() {
        let column = matrix
            .column(symbol)
            .expect("symbol taken from the matrix itself");
        let fraction = weights
            .fraction(symbol)
            .expect("weight coverage checked above");
        let base = column[0];

        for (value, close) in values.iter_mut().zip(column) {
            *value += fraction * (close / base);
        }
    }

    for value in &mut values {
        *value *= BASE_VALUE;
    }

    debug!(rows, symbols = matrix.symbol_count(), "constructed portfolio value series");
    ValueSeries::new(matrix.dates().to_vec(), values).map_err(PortfolioError::from)
}
