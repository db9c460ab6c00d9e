//! Option-level filter applied before any combinatorics.

use crate::config::ConstraintSet;
use crate::observability::record_options_filtered;
use crate::options::OptionQuote;

/// Applies the option-level half of a [`ConstraintSet`] to a quote universe.
///
/// Every configured predicate must hold. A predicate on a metric the quote
/// does not carry (IV, Greeks, spread, volume ratio) rejects the quote.
#[derive(Debug, Clone, Copy)]
pub struct OptionFilter<'c> {
    spot: f64,
    constraints: &'c ConstraintSet,
}

impl<'c> OptionFilter<'c> {
    /// Create a filter for one run.
    #[must_use]
    pub const fn new(spot: f64, constraints: &'c ConstraintSet) -> Self {
        Self { spot, constraints }
    }

    /// Underlying spot price for the run.
    #[must_use]
    pub const fn spot(&self) -> f64 {
        self.spot
    }

    /// Whether `quote` passes every configured option-level predicate.
    #[must_use]
    pub fn accepts(&self, quote: &OptionQuote) -> bool {
        let c = self.constraints;

        if c.min_volume.is_some_and(|min| quote.volume() < min) {
            return false;
        }
        if c.min_open_interest.is_some_and(|min| quote.open_interest() < min) {
            return false;
        }
        if c.min_price.is_some_and(|min| quote.price() < min) {
            return false;
        }
        if c.max_price.is_some_and(|max| quote.price() > max) {
            return false;
        }
        if c.strike_range.is_some_and(|r| !r.contains(quote.strike())) {
            return false;
        }
        if c.expiry.is_some_and(|e| quote.expiration() != e) {
            return false;
        }
        if c.days_to_expiry_range.is_some_and(|r| !r.contains(quote.days_to_expiry())) {
            return false;
        }
        if c.min_iv.is_some_and(|min| !quote.iv().is_some_and(|iv| iv >= min)) {
            return false;
        }

        let greeks = quote.greeks();
        if c.min_abs_delta
            .is_some_and(|min| !greeks.delta.is_some_and(|d| d.abs() >= min))
        {
            return false;
        }
        if c.max_abs_gamma
            .is_some_and(|max| !greeks.gamma.is_some_and(|g| g.abs() <= max))
        {
            return false;
        }

        if c.volume_ratio_range.is_some_and(|r| !r.contains_opt(quote.volume_ratio())) {
            return false;
        }
        if c.max_bid_ask_spread
            .is_some_and(|max| !quote.bid_ask_spread().is_some_and(|s| s <= max))
        {
            return false;
        }

        true
    }

    /// Keep the quotes that pass, preserving their relative order.
    pub fn apply<'a, I>(&self, universe: I) -> Vec<&'a OptionQuote>
    where
        I: IntoIterator<Item = &'a OptionQuote>,
    {
        self.apply_with(universe, |_| true)
    }

    /// Like [`apply`](Self::apply), with an extra caller predicate ANDed
    /// after the configured ones.
    pub fn apply_with<'a, I, F>(&self, universe: I, extra: F) -> Vec<&'a OptionQuote>
    where
        I: IntoIterator<Item = &'a OptionQuote>,
        F: Fn(&OptionQuote) -> bool,
    {
        let mut seen = 0usize;
        let kept: Vec<&'a OptionQuote> = universe
            .into_iter()
            .inspect(|_| seen += 1)
            .filter(|q| self.accepts(q) && extra(*q))
            .collect();

        let rejected = seen - kept.len();
        record_options_filtered(kept.len(), rejected);
        tracing::debug!(
            spot = self.spot,
            kept = kept.len(),
            rejected,
            "Applied option filter"
        );

        kept
    }
}
