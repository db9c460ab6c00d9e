//! Port for chain acquisition.

use async_trait::async_trait;
use thiserror::Error;

use super::snapshot::{ChainRow, UnderlyingQuote};

/// Chain acquisition errors.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connection, timeout, TLS).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned a non-success status.
    #[error("Unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// Still rate limited after every retry.
    #[error("Rate limited by provider after retries")]
    RateLimited,

    /// Response body did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Source of option chains for one underlying.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainSource: Send + Sync {
    /// Expiration dates (`YYYY-MM-DD`) listed for `symbol`.
    async fn expirations(&self, symbol: &str) -> Result<Vec<String>, FetchError>;

    /// Chain rows for one expiration, Greeks included.
    async fn chain(&self, symbol: &str, expiration: &str) -> Result<Vec<ChainRow>, FetchError>;

    /// Current quote for the underlying.
    async fn underlying_quote(&self, symbol: &str) -> Result<UnderlyingQuote, FetchError>;
}
