//! Chain acquisition.
//!
//! A screening run needs one [`ChainUniverse`]: the underlying's spot price
//! and every option quote with its derived metrics. It comes either from a
//! captured snapshot document ([`load_snapshot`]) or live from Tradier
//! through a [`ChainFetcher`], which spreads per-expiration requests over a
//! small worker pool behind one shared [`RateLimiter`].
//!
//! # Snapshot format
//!
//! ```json
//! {
//!   "symbols": ["SPY"],
//!   "timestamp": 1767225600.0,
//!   "underlying": { "last": 601.5, "bid": 601.4, "ask": 601.6 },
//!   "chains": { "SPY": { "2026-01-16": [ { "strike": 600, "option_type": "call", ... } ] } }
//! }
//! ```

mod fetcher;
mod rate_limiter;
mod retry;
mod snapshot;
mod source;
mod tradier;

pub use fetcher::{ChainFetcher, DEFAULT_WORKERS};
pub use rate_limiter::{DEFAULT_MIN_INTERVAL, RateLimiter};
pub use retry::{Backoff, ErrorCategory, RetryPolicy, categorize_status, parse_retry_after};
pub use snapshot::{
    ChainRow, ChainSnapshot, ChainUniverse, RowGreeks, SnapshotError, UnderlyingQuote,
    load_snapshot, parse_snapshot,
};
pub use source::{ChainSource, FetchError};
pub use tradier::{DEFAULT_TRADIER_BASE_URL, TradierClient, TradierConfig};
