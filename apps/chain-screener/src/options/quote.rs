//! Option quote value object.
//!
//! An [`OptionQuote`] is one row of a chain snapshot: the contract identity,
//! its quoted prices, liquidity and Greeks. Quotes are built once per run and
//! shared by reference across every strategy that uses them, so there are no
//! mutators. Derived metrics are recomputed on every call.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::greeks::Greeks;

/// Contract multiplier for equity options.
pub const CONTRACT_MULTIPLIER: f64 = 100.0;

/// Option side (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionSide {
    /// Call option (right to buy).
    Call,
    /// Put option (right to sell).
    Put,
}

impl std::fmt::Display for OptionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "CALL"),
            Self::Put => write!(f, "PUT"),
        }
    }
}

/// Errors from quote construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    /// Strike must be finite and strictly positive.
    #[error("Invalid strike {strike}: must be finite and > 0")]
    InvalidStrike {
        /// Rejected strike.
        strike: f64,
    },
}

/// A quoted option contract.
///
/// Deserialization goes through [`OptionQuote::new`], so a decoded quote
/// carries the same strike guarantee as a constructed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuoteRecord")]
pub struct OptionQuote {
    symbol: String,
    expiration: NaiveDate,
    strike: f64,
    side: OptionSide,
    mid: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
    iv: Option<f64>,
    volume: u64,
    open_interest: u64,
    days_to_expiry: i64,
    greeks: Greeks,
}

/// Serialized shape of [`OptionQuote`], validated on conversion.
#[derive(Deserialize)]
struct QuoteRecord {
    symbol: String,
    expiration: NaiveDate,
    strike: f64,
    side: OptionSide,
    mid: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
    iv: Option<f64>,
    volume: u64,
    open_interest: u64,
    days_to_expiry: i64,
    greeks: Greeks,
}

impl TryFrom<QuoteRecord> for OptionQuote {
    type Error = QuoteError;

    fn try_from(record: QuoteRecord) -> Result<Self, Self::Error> {
        Ok(Self::new(record.symbol, record.expiration, record.strike, record.side)?
            .with_mid(record.mid)
            .with_bid_ask(record.bid, record.ask)
            .with_iv(record.iv)
            .with_liquidity(record.volume, record.open_interest)
            .with_days_to_expiry(record.days_to_expiry)
            .with_greeks(record.greeks))
    }
}

impl OptionQuote {
    /// Create a quote with identity only; pricing fields start empty.
    ///
    /// Use the `with_*` methods to attach pricing before the quote is shared.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::InvalidStrike`] if `strike` is not a finite
    /// positive number.
    pub fn new(
        symbol: impl Into<String>,
        expiration: NaiveDate,
        strike: f64,
        side: OptionSide,
    ) -> Result<Self, QuoteError> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(QuoteError::InvalidStrike { strike });
        }

        Ok(Self {
            symbol: symbol.into(),
            expiration,
            strike,
            side,
            mid: None,
            bid: None,
            ask: None,
            iv: None,
            volume: 0,
            open_interest: 0,
            days_to_expiry: 0,
            greeks: Greeks::empty(),
        })
    }

    /// Set the mid price.
    #[must_use]
    pub const fn with_mid(mut self, mid: Option<f64>) -> Self {
        self.mid = mid;
        self
    }

    /// Set bid and ask.
    #[must_use]
    pub const fn with_bid_ask(mut self, bid: Option<f64>, ask: Option<f64>) -> Self {
        self.bid = bid;
        self.ask = ask;
        self
    }

    /// Set implied volatility.
    #[must_use]
    pub const fn with_iv(mut self, iv: Option<f64>) -> Self {
        self.iv = iv;
        self
    }

    /// Set volume and open interest.
    #[must_use]
    pub const fn with_liquidity(mut self, volume: u64, open_interest: u64) -> Self {
        self.volume = volume;
        self.open_interest = open_interest;
        self
    }

    /// Set days to expiry (negative for stale rows).
    #[must_use]
    pub const fn with_days_to_expiry(mut self, days: i64) -> Self {
        self.days_to_expiry = days;
        self
    }

    /// Set Greeks.
    #[must_use]
    pub const fn with_greeks(mut self, greeks: Greeks) -> Self {
        self.greeks = greeks;
        self
    }

    /// Underlying symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Expiration date.
    #[must_use]
    pub const fn expiration(&self) -> NaiveDate {
        self.expiration
    }

    /// Strike price.
    #[must_use]
    pub const fn strike(&self) -> f64 {
        self.strike
    }

    /// Call or put.
    #[must_use]
    pub const fn side(&self) -> OptionSide {
        self.side
    }

    /// Whether this is a call.
    #[must_use]
    pub fn is_call(&self) -> bool {
        self.side == OptionSide::Call
    }

    /// Whether this is a put.
    #[must_use]
    pub fn is_put(&self) -> bool {
        self.side == OptionSide::Put
    }

    /// Quoted mid, if any.
    #[must_use]
    pub const fn mid(&self) -> Option<f64> {
        self.mid
    }

    /// Quoted bid, if any.
    #[must_use]
    pub const fn bid(&self) -> Option<f64> {
        self.bid
    }

    /// Quoted ask, if any.
    #[must_use]
    pub const fn ask(&self) -> Option<f64> {
        self.ask
    }

    /// Implied volatility, if any.
    #[must_use]
    pub const fn iv(&self) -> Option<f64> {
        self.iv
    }

    /// Traded volume.
    #[must_use]
    pub const fn volume(&self) -> u64 {
        self.volume
    }

    /// Open interest.
    #[must_use]
    pub const fn open_interest(&self) -> u64 {
        self.open_interest
    }

    /// Calendar days until expiration.
    #[must_use]
    pub const fn days_to_expiry(&self) -> i64 {
        self.days_to_expiry
    }

    /// Quoted Greeks.
    #[must_use]
    pub const fn greeks(&self) -> &Greeks {
        &self.greeks
    }

    /// Premium used for cash flows: the mid when positive, otherwise zero.
    #[must_use]
    pub fn price(&self) -> f64 {
        match self.mid {
            Some(mid) if mid > 0.0 => mid,
            _ => 0.0,
        }
    }

    /// Out of the money relative to `spot`.
    #[must_use]
    pub fn is_otm(&self, spot: f64) -> bool {
        match self.side {
            OptionSide::Call => self.strike > spot,
            OptionSide::Put => self.strike < spot,
        }
    }

    /// Absolute bid/ask spread; `None` unless both sides are quoted.
    #[must_use]
    pub fn bid_ask_spread(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some((ask - bid).abs()),
            _ => None,
        }
    }

    /// Volume relative to open interest; `None` when open interest is zero.
    #[must_use]
    pub fn volume_ratio(&self) -> Option<f64> {
        if self.open_interest == 0 {
            return None;
        }
        Some(self.volume as f64 / self.open_interest as f64)
    }

    /// Volume plus open interest.
    #[must_use]
    pub const fn liquidity(&self) -> u64 {
        self.volume.saturating_add(self.open_interest)
    }
}

impl std::fmt::Display for OptionQuote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} exp={} mid={:.2}",
            self.side,
            self.strike,
            self.expiration,
            self.price()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 16).unwrap()
    }

    fn call(strike: f64) -> OptionQuote {
        OptionQuote::new("PLTR", expiry(), strike, OptionSide::Call).unwrap()
    }

    #[test_case(0.0 ; "zero")]
    #[test_case(-5.0 ; "negative")]
    #[test_case(f64::NAN ; "nan")]
    #[test_case(f64::INFINITY ; "infinite")]
    fn test_rejects_invalid_strike(strike: f64) {
        let result = OptionQuote::new("PLTR", expiry(), strike, OptionSide::Put);
        assert!(matches!(result, Err(QuoteError::InvalidStrike { .. })));
    }

    #[test]
    fn test_deserialize_rejects_invalid_strike() {
        let quote = call(100.0).with_mid(Some(1.5)).with_iv(Some(0.4));
        let mut value = serde_json::to_value(&quote).unwrap();
        assert_eq!(serde_json::from_value::<OptionQuote>(value.clone()).unwrap(), quote);

        value["strike"] = serde_json::json!(-5.0);
        let err = serde_json::from_value::<OptionQuote>(value).unwrap_err();
        assert!(err.to_string().contains("Invalid strike"));
    }

    #[test_case(Some(2.5), 2.5 ; "positive mid")]
    #[test_case(Some(0.0), 0.0 ; "zero mid")]
    #[test_case(Some(-1.0), 0.0 ; "negative mid")]
    #[test_case(None, 0.0 ; "missing mid")]
    fn test_price(mid: Option<f64>, expected: f64) {
        assert_eq!(call(100.0).with_mid(mid).price(), expected);
    }

    #[test]
    fn test_is_otm() {
        assert!(call(105.0).is_otm(100.0));
        assert!(!call(100.0).is_otm(100.0));
        assert!(!call(95.0).is_otm(100.0));

        let put = OptionQuote::new("PLTR", expiry(), 95.0, OptionSide::Put).unwrap();
        assert!(put.is_otm(100.0));
        assert!(!put.is_otm(95.0));
    }

    #[test]
    fn test_bid_ask_spread_requires_both_sides() {
        let tight = call(100.0).with_bid_ask(Some(1.0), Some(1.25));
        assert_eq!(tight.bid_ask_spread(), Some(0.25));

        // Crossed quotes still report a non-negative spread
        let crossed = call(100.0).with_bid_ask(Some(1.25), Some(1.0));
        assert_eq!(crossed.bid_ask_spread(), Some(0.25));

        assert_eq!(call(100.0).with_bid_ask(None, Some(1.0)).bid_ask_spread(), None);
        assert_eq!(call(100.0).with_bid_ask(Some(1.0), None).bid_ask_spread(), None);
    }

    #[test]
    fn test_volume_ratio_and_liquidity() {
        let quote = call(100.0).with_liquidity(50, 200);
        assert_eq!(quote.volume_ratio(), Some(0.25));
        assert_eq!(quote.liquidity(), 250);

        assert_eq!(call(100.0).with_liquidity(50, 0).volume_ratio(), None);
    }
}
