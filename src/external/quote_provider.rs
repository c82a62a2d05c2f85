use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

/// Source of current market prices. Lookups are remote calls and may be
/// slow or fail; callers surface failures instead of substituting a price.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_price(&self, symbol: &str) -> Result<f64, QuoteError>;
}
