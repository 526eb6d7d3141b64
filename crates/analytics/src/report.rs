use serde::{Deserialize, Serialize};

/// A comprehensive, standardized report of a portfolio's risk/return profile.
///
/// This struct is the final output of the `MetricsEngine` and serves as the
/// data transfer object for results throughout the system. All values are raw
/// decimals/ratios; formatting into percentages is the presentation layer's
/// concern.
///
/// Benchmark-relative metrics are `Option<f64>`: `None` means "no benchmark
/// was supplied", which is deliberately distinct from a computed value of
/// zero. Ratios whose denominator is degenerate (zero volatility, zero
/// drawdown, zero tracking error) are reported as 0.0: a "no signal"
/// result, not an error. Callers that need to tell the two apart can re-check
/// the denominator via the `stats` module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    // I. Growth
    /// V_last / V_first - 1 over the analyzed window.
    pub total_return: f64,
    /// mean(daily returns) * 252, arithmetic annualization.
    pub annual_return: f64,
    /// (V_last / V_first)^(252 / n) - 1, where n is the number of return
    /// observations. Geometric annualization by trading-day count, not
    /// calendar years.
    pub cagr: f64,

    // II. Risk
    /// Sample standard deviation of daily returns * sqrt(252).
    pub annual_volatility: f64,
    /// Worst peak-to-trough decline of the value series, in [-1, 0].
    pub max_drawdown: f64,
    /// 5th percentile of the daily return distribution (historical,
    /// linearly interpolated). A daily figure, typically negative.
    pub value_at_risk_95: f64,

    // III. Risk-adjusted return
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,

    // IV. Distribution shape
    /// Fisher-Pearson skewness of the daily returns.
    pub skewness: f64,

    // V. Benchmark-relative (None when no benchmark series was supplied)
    pub information_ratio: Option<f64>,
    pub beta: Option<f64>,
    /// CAPM-form annual alpha: annual return minus the CAPM-expected return.
    pub alpha: Option<f64>,
}

impl MetricsReport {
    /// Whether the benchmark-relative metrics were computed.
    pub fn has_benchmark_metrics(&self) -> bool {
        self.beta.is_some()
    }
}
