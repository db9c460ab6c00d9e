//! Worker pool that drains expirations through a shared rate limiter.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinSet;

use crate::observability::record_fetch_failure;

use super::rate_limiter::RateLimiter;
use super::snapshot::{ChainRow, ChainSnapshot};
use super::source::{ChainSource, FetchError};

/// Default number of concurrent fetch workers.
pub const DEFAULT_WORKERS: usize = 8;

type WorkQueue = Arc<Mutex<VecDeque<(usize, String)>>>;

/// Fetches every expiration of a chain with bounded concurrency.
///
/// Each request first acquires the shared [`RateLimiter`]. An expiration
/// whose fetch fails is logged and left out; the rest of the chain is still
/// returned.
pub struct ChainFetcher<S> {
    source: Arc<S>,
    limiter: Arc<RateLimiter>,
    workers: usize,
}

impl<S> std::fmt::Debug for ChainFetcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainFetcher")
            .field("limiter", &self.limiter)
            .field("workers", &self.workers)
            .finish_non_exhaustive()
    }
}

impl<S: ChainSource + 'static> ChainFetcher<S> {
    /// Create a fetcher with [`DEFAULT_WORKERS`] workers.
    #[must_use]
    pub const fn new(source: Arc<S>, limiter: Arc<RateLimiter>) -> Self {
        Self {
            source,
            limiter,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Override the worker count (at least one).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Fetch every listed expiration for `symbol`.
    ///
    /// Expirations that fail or return no rows are omitted.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] only if the expiration list itself cannot be
    /// fetched.
    pub async fn fetch_chains(
        &self,
        symbol: &str,
    ) -> Result<BTreeMap<String, Vec<ChainRow>>, FetchError> {
        self.limiter.acquire().await;
        let expirations = self.source.expirations(symbol).await?;
        let total = expirations.len();
        tracing::info!(symbol, expirations = total, "Fetching option chains");

        let queue: WorkQueue = Arc::new(Mutex::new(
            expirations.into_iter().enumerate().map(|(i, e)| (i + 1, e)).collect(),
        ));

        let mut tasks = JoinSet::new();
        for _ in 0..self.workers.min(total.max(1)) {
            let queue = Arc::clone(&queue);
            let source = Arc::clone(&self.source);
            let limiter = Arc::clone(&self.limiter);
            let symbol = symbol.to_string();
            tasks.spawn(async move { drain(queue, source, limiter, symbol, total).await });
        }

        let mut chains = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(fetched) => chains.extend(fetched),
                Err(e) => tracing::error!(error = %e, "Fetch worker panicked"),
            }
        }

        tracing::info!(
            symbol,
            fetched = chains.len(),
            failed = total - chains.len(),
            "Fetched option chains"
        );
        Ok(chains)
    }

    /// Fetch the chains and the underlying quote as a snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the expiration list or the underlying
    /// quote cannot be fetched.
    pub async fn fetch_snapshot(&self, symbol: &str) -> Result<ChainSnapshot, FetchError> {
        let symbol = symbol.trim().to_uppercase();
        let grouped = self.fetch_chains(&symbol).await?;

        self.limiter.acquire().await;
        let underlying = self.source.underlying_quote(&symbol).await?;

        let timestamp = chrono::Utc::now().timestamp_millis() as f64 / 1000.0;

        Ok(ChainSnapshot {
            symbols: vec![symbol.clone()],
            timestamp: Some(timestamp),
            underlying,
            chains: BTreeMap::from([(symbol, grouped)]),
        })
    }
}

async fn drain<S: ChainSource>(
    queue: WorkQueue,
    source: Arc<S>,
    limiter: Arc<RateLimiter>,
    symbol: String,
    total: usize,
) -> Vec<(String, Vec<ChainRow>)> {
    let mut fetched = Vec::new();
    loop {
        let Some((index, expiration)) = queue.lock().await.pop_front() else {
            break;
        };

        limiter.acquire().await;
        tracing::debug!(symbol = %symbol, index, total, expiration = %expiration, "Fetching chain");

        match source.chain(&symbol, &expiration).await {
            Ok(rows) if rows.is_empty() => {
                tracing::debug!(symbol = %symbol, expiration = %expiration, "Empty chain");
            }
            Ok(rows) => fetched.push((expiration, rows)),
            Err(e) => {
                record_fetch_failure(&symbol);
                tracing::warn!(
                    symbol = %symbol,
                    expiration = %expiration,
                    error = %e,
                    "Chain fetch failed, omitting expiration"
                );
            }
        }
    }
    fetched
}
