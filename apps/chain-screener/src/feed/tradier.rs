//! Tradier market-data client.
//!
//! Three endpoints are used: the expiration list, the chain for one
//! expiration (with Greeks) and the underlying quote. Tradier collapses
//! single-element arrays into a bare object and empty results into `null`,
//! so list payloads are decoded through [`OneOrMany`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::retry::{Backoff, ErrorCategory, RetryPolicy, categorize_status, parse_retry_after};
use super::snapshot::{ChainRow, UnderlyingQuote};
use super::source::{ChainSource, FetchError};

/// Production API root.
pub const DEFAULT_TRADIER_BASE_URL: &str = "https://api.tradier.com/v1/";

/// Largest body kept in a [`FetchError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Client settings.
#[derive(Debug, Clone)]
pub struct TradierConfig {
    /// API root; a trailing slash is added when missing.
    pub base_url: String,
    /// Bearer token.
    pub token: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retry behaviour for transient failures.
    pub retry: RetryPolicy,
}

impl TradierConfig {
    /// Production settings for `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_TRADIER_BASE_URL.to_string(),
            token: token.into(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }

    /// Override the API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// HTTP client for the Tradier API with retry logic.
#[derive(Debug, Clone)]
pub struct TradierClient {
    client: Client,
    base_url: String,
    token: String,
    retry: RetryPolicy,
}

impl TradierClient {
    /// Build a client from config.
    pub fn new(config: TradierConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        let mut base_url = config.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Ok(Self {
            client,
            base_url,
            token: config.token,
            retry: config.retry,
        })
    }

    /// GET `path` with `query`, retrying transient failures.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{path}", self.base_url);
        let mut backoff = Backoff::new(&self.retry);

        loop {
            let response = match self
                .client
                .get(&url)
                .query(query)
                .bearer_auth(&self.token)
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    if let Some(delay) = backoff.next_backoff() {
                        tracing::warn!(
                            error = %e,
                            path,
                            delay_ms = delay.as_millis(),
                            retry = backoff.retries(),
                            "Network error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(FetchError::Http(e));
                }
            };

            let status = response.status();
            if status.is_success() {
                let body = response.text().await?;
                return serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()));
            }

            match categorize_status(status.as_u16()) {
                ErrorCategory::RateLimited => {
                    let hint = retry_after(&response);
                    let Some(delay) = backoff.next_with_hint(hint) else {
                        return Err(FetchError::RateLimited);
                    };
                    tracing::warn!(
                        path,
                        delay_ms = delay.as_millis(),
                        retry = backoff.retries(),
                        "Rate limited, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                ErrorCategory::Retryable => {
                    let Some(delay) = backoff.next_backoff() else {
                        return Err(status_error(status, response).await);
                    };
                    tracing::warn!(
                        path,
                        status = status.as_u16(),
                        delay_ms = delay.as_millis(),
                        retry = backoff.retries(),
                        "Retryable error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                ErrorCategory::NonRetryable => return Err(status_error(status, response).await),
            }
        }
    }
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_retry_after)
}

async fn status_error(status: StatusCode, response: Response) -> FetchError {
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    FetchError::Status {
        status: status.as_u16(),
        body,
    }
}

// ============================================
// Wire types
// ============================================

/// A list Tradier may send as one bare element.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

fn flatten<T>(list: Option<OneOrMany<T>>) -> Vec<T> {
    list.map_or_else(Vec::new, OneOrMany::into_vec)
}

#[derive(Debug, Deserialize)]
struct ExpirationsResponse {
    expirations: Option<ExpirationDates>,
}

#[derive(Debug, Deserialize)]
struct ExpirationDates {
    date: Option<OneOrMany<String>>,
}

#[derive(Debug, Deserialize)]
struct ChainResponse {
    options: Option<ChainOptions>,
}

#[derive(Debug, Deserialize)]
struct ChainOptions {
    option: Option<OneOrMany<ChainRow>>,
}

#[derive(Debug, Deserialize)]
struct QuotesResponse {
    quotes: Option<QuoteList>,
}

#[derive(Debug, Deserialize)]
struct QuoteList {
    quote: Option<OneOrMany<TradierQuote>>,
}

#[derive(Debug, Deserialize)]
struct TradierQuote {
    last: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
    volume: Option<u64>,
    trade_date: Option<i64>,
}

impl From<TradierQuote> for UnderlyingQuote {
    fn from(q: TradierQuote) -> Self {
        Self {
            last: q.last,
            bid: q.bid,
            ask: q.ask,
            volume: q.volume,
            updated_at: q.trade_date,
        }
    }
}

#[async_trait]
impl ChainSource for TradierClient {
    async fn expirations(&self, symbol: &str) -> Result<Vec<String>, FetchError> {
        let response: ExpirationsResponse = self
            .get_json(
                "markets/options/expirations",
                &[("symbol", symbol), ("includeAllRoots", "true"), ("strikes", "false")],
            )
            .await?;
        Ok(flatten(response.expirations.and_then(|e| e.date)))
    }

    async fn chain(&self, symbol: &str, expiration: &str) -> Result<Vec<ChainRow>, FetchError> {
        let response: ChainResponse = self
            .get_json(
                "markets/options/chains",
                &[("symbol", symbol), ("expiration", expiration), ("greeks", "true")],
            )
            .await?;
        Ok(flatten(response.options.and_then(|o| o.option)))
    }

    async fn underlying_quote(&self, symbol: &str) -> Result<UnderlyingQuote, FetchError> {
        let response: QuotesResponse = self
            .get_json("markets/quotes", &[("symbols", symbol), ("greeks", "false")])
            .await?;
        flatten(response.quotes.and_then(|q| q.quote))
            .into_iter()
            .next()
            .map(UnderlyingQuote::from)
            .ok_or_else(|| FetchError::Decode(format!("no quote returned for {symbol}")))
    }
}
