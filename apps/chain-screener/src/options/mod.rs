//! Option quotes and their Greeks.
//!
//! This module provides:
//! - [`OptionQuote`], the immutable per-contract record the engine consumes
//! - Derived liquidity metrics (spread, volume ratio, moneyness)
//! - Greeks and their signed aggregation

mod greeks;
mod quote;

pub use greeks::{Greeks, NetGreeks};
pub use quote::{CONTRACT_MULTIPLIER, OptionQuote, OptionSide, QuoteError};
