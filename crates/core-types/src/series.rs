use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Checks that a date index is strictly increasing (which also rules out duplicates).
fn validate_date_index(name: &str, dates: &[NaiveDate]) -> Result<(), CoreError> {
    for pair in dates.windows(2) {
        if pair[1] <= pair[0] {
            return Err(CoreError::InvalidInput(
                name.to_string(),
                format!("dates must be strictly increasing, found {} after {}", pair[1], pair[0]),
            ));
        }
    }
    Ok(())
}

/// The raw daily close history for a single symbol, as delivered by the
/// data-acquisition layer. Different symbols may cover different date ranges;
/// aligning them onto a common index is the job of the `portfolio` crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    dates: Vec<NaiveDate>,
    closes: Vec<Decimal>,
}

impl PriceSeries {
    /// Creates a validated price series. Dates must be strictly increasing and
    /// every close must be positive.
    pub fn new(
        symbol: impl Into<String>,
        dates: Vec<NaiveDate>,
        closes: Vec<Decimal>,
    ) -> Result<Self, CoreError> {
        let symbol = symbol.into();
        if dates.len() != closes.len() {
            return Err(CoreError::InvalidInput(
                symbol,
                format!("{} dates but {} closes", dates.len(), closes.len()),
            ));
        }
        validate_date_index(&symbol, &dates)?;
        if let Some(bad) = closes.iter().find(|c| **c <= Decimal::ZERO) {
            return Err(CoreError::InvalidInput(
                symbol,
                format!("non-positive close price: {}", bad),
            ));
        }
        Ok(Self { symbol, dates, closes })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn closes(&self) -> &[Decimal] {
        &self.closes
    }

    /// The close for a specific date, if that date is present.
    pub fn close_on(&self, date: NaiveDate) -> Option<Decimal> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|idx| self.closes[idx])
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// A rectangular table of close prices: one common, strictly increasing date
/// index and one full column per symbol.
///
/// The invariant that every symbol has a price on every date is what makes the
/// downstream portfolio arithmetic valid; the aligner enforces it by dropping
/// any date where any symbol is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceMatrix {
    dates: Vec<NaiveDate>,
    columns: BTreeMap<String, Vec<Decimal>>,
}

impl PriceMatrix {
    /// Creates a validated matrix. Every column must have exactly one price
    /// per date, and all prices must be positive.
    pub fn new(
        dates: Vec<NaiveDate>,
        columns: BTreeMap<String, Vec<Decimal>>,
    ) -> Result<Self, CoreError> {
        validate_date_index("PriceMatrix", &dates)?;
        for (symbol, column) in &columns {
            if column.len() != dates.len() {
                return Err(CoreError::InvalidInput(
                    symbol.clone(),
                    format!("column has {} rows, index has {}", column.len(), dates.len()),
                ));
            }
            if let Some(bad) = column.iter().find(|c| **c <= Decimal::ZERO) {
                return Err(CoreError::InvalidInput(
                    symbol.clone(),
                    format!("non-positive close price: {}", bad),
                ));
            }
        }
        Ok(Self { dates, columns })
    }

    /// An empty matrix: the "no usable data" result of aligning disjoint
    /// histories. Distinct from a computation error.
    pub fn empty() -> Self {
        Self { dates: Vec::new(), columns: BTreeMap::new() }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn symbol_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, symbol: &str) -> Option<&[Decimal]> {
        self.columns.get(symbol).map(Vec::as_slice)
    }

    /// Number of rows (trading days) in the matrix.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// An ordered series of (date, portfolio value) observations, value > 0.
///
/// Produced by the portfolio constructor (base 100), or taken directly from a
/// single price column in the single-instrument case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSeries {
    dates: Vec<NaiveDate>,
    values: Vec<Decimal>,
}

impl ValueSeries {
    pub fn new(dates: Vec<NaiveDate>, values: Vec<Decimal>) -> Result<Self, CoreError> {
        if dates.len() != values.len() {
            return Err(CoreError::InvalidInput(
                "ValueSeries".to_string(),
                format!("{} dates but {} values", dates.len(), values.len()),
            ));
        }
        validate_date_index("ValueSeries", &dates)?;
        if let Some(bad) = values.iter().find(|v| **v <= Decimal::ZERO) {
            return Err(CoreError::InvalidInput(
                "ValueSeries".to_string(),
                format!("non-positive value: {}", bad),
            ));
        }
        Ok(Self { dates, values })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[Decimal] {
        &self.values
    }

    pub fn first_value(&self) -> Option<Decimal> {
        self.values.first().copied()
    }

    pub fn last_value(&self) -> Option<Decimal> {
        self.values.last().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Daily simple returns derived from a `ValueSeries`: r_t = V_t / V_{t-1} - 1.
///
/// One observation shorter than the series it came from. Returns are plain
/// `f64` because everything downstream of this point is statistics
/// (percentiles, moments, fractional powers), not accounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    returns: Vec<f64>,
}

impl ReturnSeries {
    pub fn new(dates: Vec<NaiveDate>, returns: Vec<f64>) -> Result<Self, CoreError> {
        if dates.len() != returns.len() {
            return Err(CoreError::InvalidInput(
                "ReturnSeries".to_string(),
                format!("{} dates but {} returns", dates.len(), returns.len()),
            ));
        }
        validate_date_index("ReturnSeries", &dates)?;
        if returns.iter().any(|r| !r.is_finite()) {
            return Err(CoreError::InvalidInput(
                "ReturnSeries".to_string(),
                "non-finite return observation".to_string(),
            ));
        }
        Ok(Self { dates, returns })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.returns
    }

    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }
}
