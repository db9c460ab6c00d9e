//! Chain snapshot documents and their conversion into a quote universe.
//!
//! The snapshot layout follows the Tradier REST responses it is assembled
//! from: one symbol, an underlying quote, and chain rows grouped by
//! expiration date.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::{Greeks, OptionQuote, OptionSide};

/// Snapshot loading errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Failed to read the snapshot file.
    #[error("Failed to read snapshot '{path}': {source}")]
    Io {
        /// Path to the snapshot.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Snapshot is not valid JSON of the expected shape.
    #[error("Failed to parse snapshot JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Snapshot names no symbol, or has no chains for it.
    #[error("Snapshot has no chains for its first symbol")]
    MissingSymbol,

    /// Neither a bid/ask pair nor a last price is quoted for the underlying.
    #[error("Snapshot has no usable underlying price")]
    MissingSpot,
}

/// Underlying quote as captured alongside the chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnderlyingQuote {
    /// Last trade price.
    pub last: Option<f64>,
    /// Best bid.
    pub bid: Option<f64>,
    /// Best ask.
    pub ask: Option<f64>,
    /// Session volume.
    pub volume: Option<u64>,
    /// Last trade time (epoch milliseconds).
    pub updated_at: Option<i64>,
}

impl UnderlyingQuote {
    /// Bid/ask midpoint when both sides are quoted, otherwise the last trade.
    #[must_use]
    pub fn spot(&self) -> Option<f64> {
        match (self.bid, self.ask, self.last) {
            (Some(bid), Some(ask), _) => Some((bid + ask) / 2.0),
            (_, _, Some(last)) => Some(last),
            _ => None,
        }
    }
}

/// Greeks block of a chain row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowGreeks {
    /// Delta.
    pub delta: Option<f64>,
    /// Gamma.
    pub gamma: Option<f64>,
    /// Theta.
    pub theta: Option<f64>,
    /// Vega.
    pub vega: Option<f64>,
    /// Rho.
    pub rho: Option<f64>,
    /// Mid implied volatility.
    pub mid_iv: Option<f64>,
    /// Bid implied volatility.
    pub bid_iv: Option<f64>,
    /// Ask implied volatility.
    pub ask_iv: Option<f64>,
    /// Smoothed volatility surface value.
    pub smv_vol: Option<f64>,
    /// Implied volatility as reported by feeds without a bid/ask split.
    pub implied_volatility: Option<f64>,
    /// Bare volatility field.
    pub volatility: Option<f64>,
}

impl RowGreeks {
    /// First positive of mid, bid, ask, smoothed, implied and bare volatility.
    #[must_use]
    pub fn resolved_iv(&self) -> Option<f64> {
        [
            self.mid_iv,
            self.bid_iv,
            self.ask_iv,
            self.smv_vol,
            self.implied_volatility,
            self.volatility,
        ]
            .into_iter()
            .flatten()
            .find(|iv| *iv > 0.0)
    }

    const fn sensitivities(&self) -> Greeks {
        Greeks {
            delta: self.delta,
            gamma: self.gamma,
            theta: self.theta,
            vega: self.vega,
            rho: self.rho,
        }
    }
}

/// One contract row of a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainRow {
    /// Strike price.
    pub strike: f64,
    /// `call` or `put`.
    pub option_type: String,
    /// Expiration as `YYYY-MM-DD`.
    pub expiration_date: String,
    /// Best bid.
    #[serde(default)]
    pub bid: Option<f64>,
    /// Best ask.
    #[serde(default)]
    pub ask: Option<f64>,
    /// Last trade.
    #[serde(default)]
    pub last: Option<f64>,
    /// Session volume.
    #[serde(default)]
    pub volume: Option<u64>,
    /// Open interest.
    #[serde(default)]
    pub open_interest: Option<u64>,
    /// Greeks and IVs, when requested.
    #[serde(default)]
    pub greeks: Option<RowGreeks>,
}

/// Why a row could not become a quote.
#[derive(Debug, Clone, PartialEq)]
enum RowRejection {
    OptionType(String),
    Expiration(String),
    Strike(f64),
}

impl std::fmt::Display for RowRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OptionType(value) => write!(f, "unknown option type '{value}'"),
            Self::Expiration(value) => write!(f, "invalid expiration '{value}'"),
            Self::Strike(value) => write!(f, "invalid strike {value}"),
        }
    }
}

impl ChainRow {
    /// Bid/ask midpoint, else last trade.
    #[must_use]
    pub fn mid(&self) -> Option<f64> {
        match (self.bid, self.ask, self.last) {
            (Some(bid), Some(ask), _) => Some((bid + ask) / 2.0),
            (_, _, Some(last)) => Some(last),
            _ => None,
        }
    }

    fn to_quote(&self, symbol: &str, as_of: NaiveDate) -> Result<OptionQuote, RowRejection> {
        let side = if self.option_type.eq_ignore_ascii_case("call") {
            OptionSide::Call
        } else if self.option_type.eq_ignore_ascii_case("put") {
            OptionSide::Put
        } else {
            return Err(RowRejection::OptionType(self.option_type.clone()));
        };

        let expiration = NaiveDate::parse_from_str(&self.expiration_date, "%Y-%m-%d")
            .map_err(|_| RowRejection::Expiration(self.expiration_date.clone()))?;

        let greeks = self.greeks.clone().unwrap_or_default();

        let quote = OptionQuote::new(symbol, expiration, self.strike, side)
            .map_err(|_| RowRejection::Strike(self.strike))?
            .with_mid(self.mid())
            .with_bid_ask(self.bid, self.ask)
            .with_iv(greeks.resolved_iv())
            .with_liquidity(self.volume.unwrap_or(0), self.open_interest.unwrap_or(0))
            .with_days_to_expiry((expiration - as_of).num_days())
            .with_greeks(greeks.sensitivities());

        Ok(quote)
    }
}

/// A captured option chain for one underlying.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Symbols captured; the first one is screened.
    pub symbols: Vec<String>,
    /// Capture time (epoch seconds).
    #[serde(default)]
    pub timestamp: Option<f64>,
    /// Underlying quote.
    #[serde(default)]
    pub underlying: UnderlyingQuote,
    /// Rows by symbol, then by expiration date.
    #[serde(default)]
    pub chains: BTreeMap<String, BTreeMap<String, Vec<ChainRow>>>,
}

/// Spot and quotes ready for screening.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainUniverse {
    /// Underlying symbol.
    pub symbol: String,
    /// Underlying spot price.
    pub spot: f64,
    /// Quotes in snapshot order (expirations ascending, rows as captured).
    pub options: Vec<OptionQuote>,
}

impl ChainSnapshot {
    /// Convert into quotes, computing days to expiry against `as_of`.
    ///
    /// Rows with an unknown option type, unparseable expiration or invalid
    /// strike are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::MissingSymbol`] when the first symbol has no
    /// chain entry and [`SnapshotError::MissingSpot`] when no underlying
    /// price is available.
    pub fn into_universe(self, as_of: NaiveDate) -> Result<ChainUniverse, SnapshotError> {
        let symbol = self
            .symbols
            .into_iter()
            .next()
            .ok_or(SnapshotError::MissingSymbol)?;
        let mut chains = self.chains;
        let expirations = chains.remove(&symbol).ok_or(SnapshotError::MissingSymbol)?;
        let spot = self.underlying.spot().ok_or(SnapshotError::MissingSpot)?;

        let mut options = Vec::new();
        let mut skipped = 0usize;
        for (expiration, rows) in &expirations {
            for row in rows {
                match row.to_quote(&symbol, as_of) {
                    Ok(quote) => options.push(quote),
                    Err(reason) => {
                        skipped += 1;
                        tracing::warn!(
                            symbol = %symbol,
                            expiration = %expiration,
                            strike = row.strike,
                            reason = %reason,
                            "Skipping chain row"
                        );
                    }
                }
            }
        }

        tracing::info!(
            symbol = %symbol,
            spot,
            expirations = expirations.len(),
            options = options.len(),
            skipped,
            "Loaded option chain"
        );

        Ok(ChainUniverse {
            symbol,
            spot,
            options,
        })
    }
}

/// Parse a snapshot document.
///
/// # Errors
///
/// Returns [`SnapshotError::Parse`] for malformed JSON, otherwise as
/// [`ChainSnapshot::into_universe`].
pub fn parse_snapshot(contents: &str, as_of: NaiveDate) -> Result<ChainUniverse, SnapshotError> {
    let snapshot: ChainSnapshot = serde_json::from_str(contents)?;
    snapshot.into_universe(as_of)
}

/// Read and parse a snapshot file.
///
/// # Errors
///
/// Returns [`SnapshotError::Io`] if the file cannot be read, otherwise as
/// [`parse_snapshot`].
pub fn load_snapshot(path: &Path, as_of: NaiveDate) -> Result<ChainUniverse, SnapshotError> {
    let contents = std::fs::read_to_string(path).map_err(|e| SnapshotError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_snapshot(&contents, as_of)
}
