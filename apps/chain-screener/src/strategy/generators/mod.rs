//! Strategy generators, one per shape.
//!
//! Each generator consumes the option pool that already passed the
//! option-level filter and emits every candidate of its shape. Generation is
//! deterministic: expiry buckets are visited in order of first appearance
//! and legs within a bucket are stably sorted by strike.

mod forward_vol;
mod iron_condor;
mod single_call;
mod straddle;
mod strangle;

use chrono::NaiveDate;

use crate::config::ConstraintSet;
use crate::options::OptionQuote;

use super::types::{Shape, Strategy};

pub use forward_vol::{DAYS_PER_YEAR, ForwardVolGenerator, forward_volatility};
pub use iron_condor::IronCondorGenerator;
pub use single_call::SingleCallGenerator;
pub use straddle::StraddleGenerator;
pub use strangle::StrangleGenerator;

/// Builds candidate strategies of one shape from a filtered option pool.
pub trait StrategyGenerator: Send + Sync {
    /// Shape this generator emits.
    fn shape(&self) -> Shape;

    /// Emit every candidate of this shape.
    fn generate<'a>(
        &self,
        options: &[&'a OptionQuote],
        spot: f64,
        constraints: &ConstraintSet,
    ) -> Vec<Strategy<'a>>;
}

/// Generators in registration order, which fixes the output order of a run.
#[must_use]
pub fn registry() -> Vec<Box<dyn StrategyGenerator>> {
    vec![
        Box::new(SingleCallGenerator),
        Box::new(IronCondorGenerator),
        Box::new(StraddleGenerator),
        Box::new(StrangleGenerator),
        Box::new(ForwardVolGenerator),
    ]
}

/// Quotes for one expiration, split by side and sorted ascending by strike.
#[derive(Debug, Default)]
pub(crate) struct ExpiryChain<'a> {
    pub expiration: Option<NaiveDate>,
    pub calls: Vec<&'a OptionQuote>,
    pub puts: Vec<&'a OptionQuote>,
}

/// Partition by expiration in order of first appearance.
pub(crate) fn group_by_expiry<'a>(options: &[&'a OptionQuote]) -> Vec<ExpiryChain<'a>> {
    let mut chains: Vec<ExpiryChain<'a>> = Vec::new();

    for &quote in options {
        let idx = match chains
            .iter()
            .position(|c| c.expiration == Some(quote.expiration()))
        {
            Some(idx) => idx,
            None => {
                chains.push(ExpiryChain {
                    expiration: Some(quote.expiration()),
                    ..ExpiryChain::default()
                });
                chains.len() - 1
            }
        };

        let chain = &mut chains[idx];
        if quote.is_call() {
            chain.calls.push(quote);
        } else {
            chain.puts.push(quote);
        }
    }

    for chain in &mut chains {
        sort_by_strike(&mut chain.calls);
        sort_by_strike(&mut chain.puts);
    }

    chains
}

/// Stable ascending sort by strike.
pub(crate) fn sort_by_strike(quotes: &mut [&OptionQuote]) {
    quotes.sort_by(|a, b| a.strike().total_cmp(&b.strike()));
}


#[cfg(test)]
mod tests {
    use super::test_support::{call, date, put, quote, refs};
    use super::*;
    use crate::options::OptionSide;

    #[test]
    fn test_group_by_expiry_keeps_first_appearance_order() {
        let quotes = vec![
            quote(date(3, 20), OptionSide::Call, 110.0, 1.0),
            call(105.0, 1.0),
            put(95.0, 1.0),
            quote(date(3, 20), OptionSide::Call, 100.0, 1.0),
            call(100.0, 1.0),
        ];
        let chains = group_by_expiry(&refs(&quotes));

        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].expiration, Some(date(3, 20)));
        assert_eq!(chains[1].expiration, Some(date(1, 16)));

        let strikes: Vec<f64> = chains[0].calls.iter().map(|q| q.strike()).collect();
        assert_eq!(strikes, vec![100.0, 110.0]);
        let strikes: Vec<f64> = chains[1].calls.iter().map(|q| q.strike()).collect();
        assert_eq!(strikes, vec![100.0, 105.0]);
        assert_eq!(chains[1].puts.len(), 1);
    }

    #[test]
    fn test_registry_order_is_fixed() {
        let shapes: Vec<Shape> = registry().iter().map(|g| g.shape()).collect();
        assert_eq!(
            shapes,
            vec![
                Shape::SingleCall,
                Shape::IronCondor,
                Shape::Straddle,
                Shape::Strangle,
                Shape::ForwardVol,
            ]
        );
    }
}
