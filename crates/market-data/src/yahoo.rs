use crate::error::MarketDataError;
use crate::responses::{ChartResponse, into_price_series};
use crate::retry::RetryPolicy;
use crate::{MarketDataClient, validate_history};
use async_trait::async_trait;
use configuration::DataSourceConfig;
use core_types::PriceSeries;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

/// A client for the Yahoo Finance chart API.
///
/// Symbols are stored and reported in display form ("INFY"); the configured
/// exchange suffix (".NS") is appended only on the wire. The provider
/// throttles aggressively, so every request runs under the injected
/// [`RetryPolicy`].
pub struct YahooFinanceClient {
    http: reqwest::Client,
    base_url: String,
    ticker_suffix: Option<String>,
    retry: RetryPolicy,
}

impl YahooFinanceClient {
    pub fn new(config: &DataSourceConfig) -> Self {
        info!("Initializing Yahoo Finance client against {}", config.base_url);
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ticker_suffix: config.ticker_suffix.clone(),
            retry: RetryPolicy::from(&config.retry),
        }
    }

    /// The symbol as sent to the provider, with the exchange suffix applied.
    /// Index symbols (leading '^') are never suffixed.
    fn request_symbol(&self, symbol: &str) -> String {
        match &self.ticker_suffix {
            Some(suffix) if !symbol.starts_with('^') && !symbol.ends_with(suffix.as_str()) => {
                format!("{symbol}{suffix}")
            }
            _ => symbol.to_string(),
        }
    }

    async fn request_once(
        &self,
        symbol: &str,
        period: &str,
    ) -> Result<PriceSeries, MarketDataError> {
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_url,
            self.request_symbol(symbol)
        );
        debug!(%symbol, %period, "Requesting daily closes");

        let response = self
            .http
            .get(&url)
            .query(&[("range", period), ("interval", "1d")])
            // The provider rejects requests without a browser-like agent.
            .header(reqwest::header::USER_AGENT, "Mozilla/5.0")
            .send()
            .await?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited(response.status().as_u16()));
        }
        let response = response.error_for_status()?;

        let payload = response
            .json::<ChartResponse>()
            .await
            .map_err(|e| MarketDataError::Deserialization(e.to_string()))?;

        into_price_series(payload, symbol)
    }

    /// Fetches one symbol's history, retrying rate-limit and transient
    /// transport failures per the backoff schedule.
    async fn fetch_with_retry(
        &self,
        symbol: &str,
        period: &str,
    ) -> Result<PriceSeries, MarketDataError> {
        let mut attempt = 0;
        loop {
            match self.request_once(symbol, period).await {
                Ok(series) => {
                    validate_history(&series)?;
                    debug!(%symbol, observations = series.len(), "Fetched daily closes");
                    return Ok(series);
                }
                Err(e) if e.is_retryable() && attempt + 1 < self.retry.max_attempts() => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        %symbol,
                        attempt = attempt + 1,
                        delay_secs = delay.as_secs(),
                        "Retryable fetch failure: {e}"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl MarketDataClient for YahooFinanceClient {
    async fn fetch_daily_closes(
        &self,
        symbols: &[String],
        period: &str,
    ) -> Result<Vec<PriceSeries>, MarketDataError> {
        // Sequential on purpose: fanning out per symbol trips the provider's
        // rate limiter far sooner than it saves wall time.
        let mut histories = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            histories.push(self.fetch_with_retry(symbol, period).await?);
        }
        Ok(histories)
    }

    async fn fetch_benchmark(
        &self,
        symbol: &str,
        period: &str,
    ) -> Result<PriceSeries, MarketDataError> {
        self.fetch_with_retry(symbol, period).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use configuration::RetrySettings;

    fn client_with_suffix(suffix: Option<&str>) -> YahooFinanceClient {
        YahooFinanceClient::new(&DataSourceConfig {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            ticker_suffix: suffix.map(str::to_string),
            benchmark_symbol: Some("^NSEI".to_string()),
            retry: RetrySettings::default(),
        })
    }

    #[test]
    fn suffix_is_applied_to_equities() {
        let client = client_with_suffix(Some(".NS"));
        assert_eq!(client.request_symbol("INFY"), "INFY.NS");
    }

    #[test]
    fn suffix_is_not_applied_to_indices_or_twice() {
        let client = client_with_suffix(Some(".NS"));
        assert_eq!(client.request_symbol("^NSEI"), "^NSEI");
        assert_eq!(client.request_symbol("TCS.NS"), "TCS.NS");
    }

    #[test]
    fn no_suffix_means_passthrough() {
        let client = client_with_suffix(None);
        assert_eq!(client.request_symbol("AAPL"), "AAPL");
    }
}
