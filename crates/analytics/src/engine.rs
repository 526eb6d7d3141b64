use crate::error::AnalyticsError;
use crate::report::MetricsReport;
use crate::stats;
use core_types::{ReturnSeries, ValueSeries};
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

/// Trading days per year, used for all annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Denominators smaller than this are treated as degenerate: the ratio is
/// reported as 0.0 ("no signal") instead of exploding.
const NEAR_ZERO: f64 = 1e-12;

/// A stateless calculator that derives the full metrics battery from a value
/// series and its daily return series.
#[derive(Debug, Clone, Copy)]
pub struct MetricsEngine {
    /// Annual risk-free rate as a decimal (e.g. 0.065 for 6.5%).
    risk_free_rate: f64,
}

impl MetricsEngine {
    pub fn new(risk_free_rate: f64) -> Self {
        Self { risk_free_rate }
    }

    /// The main entry point for metric calculation.
    ///
    /// # Arguments
    ///
    /// * `values` - The value series the returns were derived from (needed
    ///   for total return, CAGR and drawdown).
    /// * `returns` - The portfolio's daily simple returns; must be exactly
    ///   one observation shorter than `values`.
    /// * `benchmark` - Optional benchmark daily returns on the same date
    ///   alignment. Without it, Information Ratio, Beta and Alpha are
    ///   reported as not computed rather than failing the analysis.
    ///
    /// All formulas are total over well-formed input: degenerate
    /// denominators yield 0.0, never an error.
    pub fn compute(
        &self,
        values: &ValueSeries,
        returns: &ReturnSeries,
        benchmark: Option<&ReturnSeries>,
    ) -> Result<MetricsReport, AnalyticsError> {
        if values.len() < 2 {
            return Err(AnalyticsError::NotEnoughData(format!(
                "need at least 2 value observations, got {}",
                values.len()
            )));
        }
        if returns.len() != values.len() - 1 {
            return Err(AnalyticsError::ShapeMismatch(format!(
                "{} returns for {} values",
                returns.len(),
                values.len()
            )));
        }
        if let Some(bench) = benchmark {
            if bench.len() != returns.len() {
                return Err(AnalyticsError::ShapeMismatch(format!(
                    "benchmark has {} returns, portfolio has {}",
                    bench.len(),
                    returns.len()
                )));
            }
        }

        let r = returns.values();
        let n = r.len() as f64;
        let annualization = TRADING_DAYS_PER_YEAR.sqrt();

        // 1. Growth metrics, from the value series.
        let first = values.values()[0];
        let last = values.values()[values.len() - 1];
        let growth = (last / first)
            .to_f64()
            .ok_or_else(|| AnalyticsError::ShapeMismatch("growth factor overflows f64".into()))?;
        let total_return = growth - 1.0;
        let cagr = growth.powf(TRADING_DAYS_PER_YEAR / n) - 1.0;
        let annual_return = stats::mean(r) * TRADING_DAYS_PER_YEAR;

        // 2. Risk metrics.
        let annual_volatility = stats::sample_std(r) * annualization;
        let max_drawdown = max_drawdown(values);
        let value_at_risk_95 = stats::percentile(r, 5.0);

        // 3. Risk-adjusted ratios, all guarded by the degenerate policy.
        let excess_return = annual_return - self.risk_free_rate;
        let sharpe_ratio = ratio(excess_return, annual_volatility);
        let sortino_ratio = ratio(excess_return, stats::downside_deviation(r) * annualization);
        let calmar_ratio = ratio(annual_return, max_drawdown.abs());

        // 4. Distribution shape.
        let skewness = stats::skewness(r);

        // 5. Benchmark-relative metrics, only when a benchmark is present.
        let (information_ratio, beta, alpha) = match benchmark {
            Some(bench) => {
                let b = bench.values();
                let benchmark_annual = stats::mean(b) * TRADING_DAYS_PER_YEAR;

                let active: Vec<f64> = r.iter().zip(b).map(|(p, m)| p - m).collect();
                let tracking_error = stats::sample_std(&active) * annualization;
                let information_ratio =
                    ratio(annual_return - benchmark_annual, tracking_error);

                let beta = ratio(
                    stats::sample_covariance(r, b),
                    stats::sample_variance(b),
                );
                let alpha = annual_return
                    - (self.risk_free_rate + beta * (benchmark_annual - self.risk_free_rate));

                (Some(information_ratio), Some(beta), Some(alpha))
            }
            None => (None, None, None),
        };

        debug!(
            observations = r.len(),
            with_benchmark = benchmark.is_some(),
            "computed metrics report"
        );

        Ok(MetricsReport {
            total_return,
            annual_return,
            cagr,
            annual_volatility,
            max_drawdown,
            value_at_risk_95,
            sharpe_ratio,
            sortino_ratio,
            calmar_ratio,
            skewness,
            information_ratio,
            beta,
            alpha,
        })
    }
}

/// A ratio that reports 0.0 instead of raising on a zero or near-zero
/// denominator.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() < NEAR_ZERO {
        0.0
    } else {
        numerator / denominator
    }
}

/// The worst peak-to-trough decline: min over t of V_t / max(V_0..V_t) - 1.
///
/// Always in [-1, 0]; exactly 0 for a monotonically non-decreasing series.
fn max_drawdown(values: &ValueSeries) -> f64 {
    let mut worst = 0.0_f64;
    let mut peak = f64::MIN;

    for value in values.values() {
        let value = value.to_f64().unwrap_or(0.0);
        if value > peak {
            peak = value;
        }
        let drawdown = value / peak - 1.0;
        if drawdown < worst {
            worst = drawdown;
        }
    }

    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    const RISK_FREE: f64 = 0.065;

    fn d(day: u32) -> NaiveDate {
        // 60 consecutive synthetic trading days is plenty for these cases.
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(day as u64 - 1)
    }

    fn value_series(values: &[Decimal]) -> ValueSeries {
        let dates = (1..=values.len() as u32).map(d).collect();
        ValueSeries::new(dates, values.to_vec()).unwrap()
    }

    fn return_series(returns: &[f64]) -> ReturnSeries {
        let dates = (2..=returns.len() as u32 + 1).map(d).collect();
        ReturnSeries::new(dates, returns.to_vec()).unwrap()
    }

    fn analyze(values: &[Decimal]) -> MetricsReport {
        let values = value_series(values);
        let returns = derive_returns(&values);
        MetricsEngine::new(RISK_FREE)
            .compute(&values, &returns, None)
            .unwrap()
    }

    fn derive_returns(values: &ValueSeries) -> ReturnSeries {
        let returns: Vec<f64> = values
            .values()
            .windows(2)
            .map(|w| ((w[1] - w[0]) / w[0]).to_f64().unwrap())
            .collect();
        return_series(&returns)
    }

    #[test]
    fn steady_growth_scenario() {
        // Prices 100 -> 110 -> 121: two identical +10% days.
        let report = analyze(&[dec!(100), dec!(110), dec!(121)]);

        assert!((report.total_return - 0.21).abs() < 1e-12);
        assert!((report.annual_return - 0.10 * 252.0).abs() < 1e-9);
        // CAGR exponent is 252 / n with n = 2 return observations.
        let expected_cagr = 1.21_f64.powf(252.0 / 2.0) - 1.0;
        assert!((report.cagr - expected_cagr).abs() / expected_cagr < 1e-12);
        // Identical returns: sample stdev 0, so volatility and Sharpe
        // degenerate to 0.
        assert_eq!(report.annual_volatility, 0.0);
        assert_eq!(report.sharpe_ratio, 0.0);
        // No negative returns: Sortino degenerates to 0.
        assert_eq!(report.sortino_ratio, 0.0);
        assert_eq!(report.max_drawdown, 0.0);
        assert!(!report.has_benchmark_metrics());
    }

    #[test]
    fn constant_series_produces_all_zero_metrics() {
        let report = analyze(&[dec!(100); 10]);

        assert_eq!(report.total_return, 0.0);
        assert_eq!(report.annual_return, 0.0);
        assert_eq!(report.cagr, 0.0);
        assert_eq!(report.annual_volatility, 0.0);
        assert_eq!(report.max_drawdown, 0.0);
        assert_eq!(report.sharpe_ratio, 0.0);
        assert_eq!(report.sortino_ratio, 0.0);
        assert_eq!(report.calmar_ratio, 0.0);
    }

    #[test]
    fn strictly_increasing_series_has_zero_drawdown() {
        let report = analyze(&[dec!(100), dec!(101), dec!(105), dec!(112), dec!(130)]);
        assert_eq!(report.max_drawdown, 0.0);
        // With no drawdown Calmar degenerates to 0 regardless of return.
        assert_eq!(report.calmar_ratio, 0.0);
    }

    #[test]
    fn drawdown_is_bounded_and_negative() {
        let report = analyze(&[
            dec!(100),
            dec!(120),
            dec!(90),
            dec!(95),
            dec!(130),
            dec!(70),
        ]);

        assert!(report.max_drawdown < 0.0);
        assert!(report.max_drawdown >= -1.0);
        // Peak 130 to trough 70.
        assert!((report.max_drawdown - (70.0 / 130.0 - 1.0)).abs() < 1e-12);
        assert!(report.calmar_ratio != 0.0);
    }

    #[test]
    fn value_at_risk_lies_within_observed_returns() {
        let report = analyze(&[
            dec!(100),
            dec!(103),
            dec!(99),
            dec!(104),
            dec!(98),
            dec!(101),
        ]);

        let values = value_series(&[
            dec!(100),
            dec!(103),
            dec!(99),
            dec!(104),
            dec!(98),
            dec!(101),
        ]);
        let returns = derive_returns(&values);
        let min = returns.values().iter().copied().fold(f64::MAX, f64::min);
        let max = returns.values().iter().copied().fold(f64::MIN, f64::max);

        assert!(report.value_at_risk_95 >= min);
        assert!(report.value_at_risk_95 <= max);
        // With wins and losses mixed, the 5th percentile is a loss.
        assert!(report.value_at_risk_95 < 0.0);
    }

    #[test]
    fn benchmark_identical_to_portfolio_gives_unit_beta_zero_alpha() {
        let values = value_series(&[dec!(100), dec!(104), dec!(101), dec!(107), dec!(103)]);
        let returns = derive_returns(&values);
        let benchmark = returns.clone();

        let report = MetricsEngine::new(RISK_FREE)
            .compute(&values, &returns, Some(&benchmark))
            .unwrap();

        assert!((report.beta.unwrap() - 1.0).abs() < 1e-12);
        assert!(report.alpha.unwrap().abs() < 1e-9);
        // Zero tracking error: the Information Ratio degenerates to 0.
        assert_eq!(report.information_ratio.unwrap(), 0.0);
    }

    #[test]
    fn missing_benchmark_omits_relative_metrics() {
        let report = analyze(&[dec!(100), dec!(102), dec!(104)]);
        assert_eq!(report.information_ratio, None);
        assert_eq!(report.beta, None);
        assert_eq!(report.alpha, None);
    }

    #[test]
    fn mismatched_return_length_is_rejected() {
        let values = value_series(&[dec!(100), dec!(101), dec!(102)]);
        let returns = return_series(&[0.01]);
        let result = MetricsEngine::new(RISK_FREE).compute(&values, &returns, None);
        assert!(matches!(result, Err(AnalyticsError::ShapeMismatch(_))));
    }

    #[test]
    fn mismatched_benchmark_length_is_rejected() {
        let values = value_series(&[dec!(100), dec!(101), dec!(102)]);
        let returns = derive_returns(&values);
        let benchmark = return_series(&[0.01]);
        let result =
            MetricsEngine::new(RISK_FREE).compute(&values, &returns, Some(&benchmark));
        assert!(matches!(result, Err(AnalyticsError::ShapeMismatch(_))));
    }

    #[test]
    fn single_observation_is_not_enough() {
        let values = value_series(&[dec!(100)]);
        let returns = return_series(&[]);
        let result = MetricsEngine::new(RISK_FREE).compute(&values, &returns, None);
        assert!(matches!(result, Err(AnalyticsError::NotEnoughData(_))));
    }
}
