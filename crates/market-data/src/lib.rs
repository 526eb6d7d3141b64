//! # Vantage Market Data
//!
//! The data-acquisition collaborator: everything about getting daily close
//! history into the system lives here, so the analytics engine never has to
//! know about HTTP, rate limits, or ticker suffixes.
//!
//! ## Guarantees to the engine
//!
//! - Every returned `PriceSeries` has at least [`MIN_OBSERVATIONS`] closes;
//!   anything shorter surfaces as a distinguishable `TooShort` error rather
//!   than silently flowing downstream.
//! - "The provider returned nothing usable" is a `NoData` error, never an
//!   empty series.
//! - Rate limiting is retried with exponential backoff per the injected
//!   [`RetryPolicy`] before it becomes the caller's problem.

use async_trait::async_trait;
use core_types::PriceSeries;

pub mod error;
pub mod responses;
pub mod retry;
pub mod yahoo;

// --- Public API ---
pub use error::MarketDataError;
pub use retry::RetryPolicy;
pub use yahoo::YahooFinanceClient;

/// Minimum number of daily closes a symbol must have to be worth analyzing.
/// Below this the statistics are too noisy to present.
pub const MIN_OBSERVATIONS: usize = 50;

/// The generic, abstract interface for a daily-close history provider.
/// This trait is the contract the application uses, allowing the underlying
/// implementation (live or mock) to be swapped out.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Fetches daily close history for each symbol over the given period
    /// ("1y", "3y", "5y", "10y").
    async fn fetch_daily_closes(
        &self,
        symbols: &[String],
        period: &str,
    ) -> Result<Vec<PriceSeries>, MarketDataError>;

    /// Fetches the benchmark index history over the given period.
    async fn fetch_benchmark(
        &self,
        symbol: &str,
        period: &str,
    ) -> Result<PriceSeries, MarketDataError>;
}

/// Checks the minimum-observation guarantee for a fetched series.
pub fn validate_history(series: &PriceSeries) -> Result<(), MarketDataError> {
    if series.is_empty() {
        return Err(MarketDataError::NoData(series.symbol().to_string()));
    }
    if series.len() < MIN_OBSERVATIONS {
        return Err(MarketDataError::TooShort {
            symbol: series.symbol().to_string(),
            got: series.len(),
            need: MIN_OBSERVATIONS,
        });
    }
    Ok(())
}
