use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to deserialize provider response: {0}")]
    Deserialization(String),

    #[error("Provider rate limit hit (HTTP {0})")]
    RateLimited(u16),

    #[error("No price data returned for symbol '{0}'")]
    NoData(String),

    #[error("Symbol '{symbol}' has only {got} daily closes, need at least {need}")]
    TooShort { symbol: String, got: usize, need: usize },

    #[error("Core type error: {0}")]
    Core(#[from] core_types::CoreError),
}

impl MarketDataError {
    /// Whether a retry with backoff could plausibly succeed. Rate limiting
    /// and transient transport failures qualify; a short or empty history
    /// will not improve by asking again.
    pub fn is_retryable(&self) -> bool {
        match self {
            MarketDataError::RateLimited(_) => true,
            MarketDataError::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
