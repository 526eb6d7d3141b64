use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A symbol -> percent-weight allocation as entered by the user (e.g. 60/40).
///
/// Validation of the "weights sum to 100 +/- 0.01" rule belongs to the caller
/// (the configuration layer); this type only guarantees non-negative weights
/// and hands fractions (weight / 100) to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    weights: BTreeMap<String, Decimal>,
}

impl WeightVector {
    pub fn new(weights: BTreeMap<String, Decimal>) -> Result<Self, CoreError> {
        for (symbol, weight) in &weights {
            if *weight < Decimal::ZERO {
                return Err(CoreError::InvalidInput(
                    symbol.clone(),
                    format!("negative weight: {}", weight),
                ));
            }
        }
        Ok(Self { weights })
    }

    /// The degenerate single-instrument allocation: one symbol at 100%.
    pub fn single(symbol: impl Into<String>) -> Self {
        let mut weights = BTreeMap::new();
        weights.insert(symbol.into(), Decimal::from(100));
        Self { weights }
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    /// The percent weight assigned to a symbol, if present.
    pub fn percent(&self, symbol: &str) -> Option<Decimal> {
        self.weights.get(symbol).copied()
    }

    /// The fractional weight (percent / 100) assigned to a symbol, if present.
    pub fn fraction(&self, symbol: &str) -> Option<Decimal> {
        self.weights
            .get(symbol)
            .map(|w| w / Decimal::from(100))
    }

    /// Sum of all percent weights. 100 for a fully allocated portfolio.
    pub fn total_percent(&self) -> Decimal {
        self.weights.values().sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
