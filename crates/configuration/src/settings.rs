use crate::error::ConfigError;
use core_types::WeightVector;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data_source: DataSourceConfig,
    pub analysis: AnalysisConfig,
    pub portfolio_a: PortfolioDefinition,
    /// A second portfolio to compare against. Optional: a single-portfolio
    /// (or single-stock) analysis simply leaves this out.
    pub portfolio_b: Option<PortfolioDefinition>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.portfolio_a.validate()?;
        if let Some(portfolio_b) = &self.portfolio_b {
            portfolio_b.validate()?;
        }
        Ok(())
    }
}

/// Connection parameters for the quote provider.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSourceConfig {
    /// Base URL of the chart endpoint (e.g. "https://query1.finance.yahoo.com").
    pub base_url: String,
    /// Exchange suffix appended to every ticker for the provider request
    /// (e.g. ".NS" for NSE symbols). Display symbols stay unsuffixed.
    pub ticker_suffix: Option<String>,
    /// Market index used for benchmark-relative metrics (e.g. "^NSEI").
    /// Without it, Information Ratio, Beta and Alpha are not computed.
    pub benchmark_symbol: Option<String>,
    #[serde(default)]
    pub retry: RetrySettings,
}

/// Retry/backoff behavior for rate-limited provider requests.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_secs: u64,
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        // 10s, 20s, 40s. The provider throttles NSE symbols aggressively.
        Self { max_attempts: 3, base_delay_secs: 10, jitter: true }
    }
}

/// Parameters for a single analysis run.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// How much history to request: "1y", "3y", "5y" or "10y".
    pub period: String,
    /// Annual risk-free rate as a decimal (e.g. 0.065 for 6.5%).
    pub risk_free_rate: f64,
}

/// A user-defined weighted portfolio: a name plus symbol -> percent weights.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioDefinition {
    pub name: String,
    pub holdings: BTreeMap<String, Decimal>,
}

/// Tolerance on the 100% weight-sum rule, matching what users can plausibly
/// enter by hand.
const WEIGHT_SUM_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2); // 0.01

impl PortfolioDefinition {
    /// Enforces the caller-side contract: at least one holding, no negative
    /// weights, and percent weights summing to 100 within 0.01.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.holdings.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "portfolio '{}' has no holdings",
                self.name
            )));
        }
        let total: Decimal = self.holdings.values().sum();
        if (total - Decimal::ONE_HUNDRED).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::ValidationError(format!(
                "portfolio '{}' weights sum to {}%, must be 100%",
                self.name, total
            )));
        }
        Ok(())
    }

    pub fn symbols(&self) -> Vec<String> {
        self.holdings.keys().cloned().collect()
    }

    /// The validated allocation as the engine-facing weight vector.
    pub fn weight_vector(&self) -> Result<WeightVector, ConfigError> {
        WeightVector::new(self.holdings.clone())
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn definition(entries: &[(&str, Decimal)]) -> PortfolioDefinition {
        PortfolioDefinition {
            name: "Test".to_string(),
            holdings: entries
                .iter()
                .map(|(symbol, weight)| (symbol.to_string(), *weight))
                .collect(),
        }
    }

    #[test]
    fn accepts_weights_summing_to_one_hundred() {
        let def = definition(&[("INFY", dec!(60)), ("TCS", dec!(40))]);
        assert!(def.validate().is_ok());
    }

    #[test]
    fn accepts_rounding_error_within_tolerance() {
        let def = definition(&[
            ("A", dec!(33.33)),
            ("B", dec!(33.33)),
            ("C", dec!(33.34)),
        ]);
        assert!(def.validate().is_ok());

        let def = definition(&[("A", dec!(33.33)), ("B", dec!(33.33)), ("C", dec!(33.33))]);
        assert!(def.validate().is_ok()); // 99.99, inside the 0.01 tolerance
    }

    #[test]
    fn rejects_underallocated_portfolio() {
        let def = definition(&[("INFY", dec!(60)), ("TCS", dec!(30))]);
        assert!(def.validate().is_err());
    }

    #[test]
    fn rejects_empty_portfolio() {
        let def = definition(&[]);
        assert!(def.validate().is_err());
    }

    #[test]
    fn weight_vector_carries_the_holdings() {
        let def = definition(&[("INFY", dec!(100))]);
        let vector = def.weight_vector().unwrap();
        assert_eq!(vector.fraction("INFY"), Some(dec!(1)));
    }
}
