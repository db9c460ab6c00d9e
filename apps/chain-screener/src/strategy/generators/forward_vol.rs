//! Forward volatility pairs across expirations.
//!
//! Under variance additivity, the implied variance between two expirations
//! is `(iv2² · T2 − iv1² · T1) / (T2 − T1)`. Pairs whose horizon does not
//! strictly increase or whose forward variance is not positive are omitted.
//! A contract missing implied volatility at either expiration is skipped
//! rather than treated as zero.

use std::collections::HashMap;

use crate::config::ConstraintSet;
use crate::options::{OptionQuote, OptionSide};
use crate::strategy::types::{ForwardVolPair, Shape, Strategy};

use super::{StrategyGenerator, group_by_expiry};

/// Day count used to annualise days to expiry.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Annualised forward volatility between two term-structure points.
///
/// `t1` and `t2` are year fractions. Returns `None` when the horizon does not
/// strictly increase or the forward variance is not positive.
#[must_use]
pub fn forward_volatility(iv1: f64, t1: f64, iv2: f64, t2: f64) -> Option<f64> {
    let den = t2 - t1;
    if den.is_nan() || den <= 0.0 {
        return None;
    }
    let num = iv2 * iv2 * t2 - iv1 * iv1 * t1;
    if num.is_nan() || num <= 0.0 {
        return None;
    }
    Some((num / den).sqrt())
}

/// Contract identity within one expiration.
type ContractKey = (OptionSide, u64);

fn contract_key(quote: &OptionQuote) -> ContractKey {
    (quote.side(), quote.strike().to_bits())
}

fn year_fraction(quote: &OptionQuote) -> f64 {
    quote.days_to_expiry().max(0) as f64 / DAYS_PER_YEAR
}

/// One quote per contract key, in key order (calls then puts, ascending
/// strike). Duplicate rows keep the first one.
fn unique_contracts<'a>(calls: &[&'a OptionQuote], puts: &[&'a OptionQuote]) -> Vec<&'a OptionQuote> {
    let mut out: Vec<&'a OptionQuote> = Vec::with_capacity(calls.len() + puts.len());
    for &quote in calls.iter().chain(puts) {
        if out.last().is_none_or(|prev| contract_key(prev) != contract_key(quote)) {
            out.push(quote);
        }
    }
    out
}

/// Emits a forward-vol pair for every contract quoted at two expirations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardVolGenerator;

impl StrategyGenerator for ForwardVolGenerator {
    fn shape(&self) -> Shape {
        Shape::ForwardVol
    }

    fn generate<'a>(
        &self,
        options: &[&'a OptionQuote],
        _spot: f64,
        constraints: &ConstraintSet,
    ) -> Vec<Strategy<'a>> {
        let mut chains = group_by_expiry(options);
        chains.sort_by_key(|c| c.expiration);

        let expiries: Vec<Vec<&'a OptionQuote>> = chains
            .iter()
            .map(|c| unique_contracts(&c.calls, &c.puts))
            .collect();
        let lookup: Vec<HashMap<ContractKey, &'a OptionQuote>> = expiries
            .iter()
            .map(|quotes| quotes.iter().map(|&q| (contract_key(q), q)).collect())
            .collect();

        let mut strategies = Vec::new();
        for (i, near_quotes) in expiries.iter().enumerate() {
            for far_lookup in &lookup[i + 1..] {
                for &near in near_quotes {
                    let Some(&far) = far_lookup.get(&contract_key(near)) else {
                        continue;
                    };
                    let (Some(iv1), Some(iv2)) = (near.iv(), far.iv()) else {
                        continue;
                    };
                    let Some(forward_vol) =
                        forward_volatility(iv1, year_fraction(near), iv2, year_fraction(far))
                    else {
                        continue;
                    };
                    if let Some(range) = constraints.forward_vol_range
                        && !range.contains(forward_vol)
                    {
                        continue;
                    }

                    strategies.push(Strategy::ForwardVolPair(ForwardVolPair {
                        near,
                        far,
                        forward_vol,
                    }));
                }
            }
        }

        strategies
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{date, quote, refs};
    use super::*;
    use crate::config::Bounds;
    use proptest::prelude::*;
    use crate::strategy::Strategy;

    fn contract(month: u32, side: OptionSide, strike: f64, days: i64, iv: f64) -> OptionQuote {
        quote(date(month, 16), side, strike, 2.0)
            .with_days_to_expiry(days)
            .with_iv(Some(iv))
    }

    #[test]
    fn test_increasing_term_structure_emits_pair() {
        let quotes = vec![
            contract(1, OptionSide::Call, 100.0, 30, 0.20),
            contract(2, OptionSide::Call, 100.0, 60, 0.30),
        ];
        let strategies =
            ForwardVolGenerator.generate(&refs(&quotes), 100.0, &ConstraintSet::default());

        let t1: f64 = 30.0 / 365.0;
        let t2: f64 = 60.0 / 365.0;
        let expected = ((0.09 * t2 - 0.04 * t1) / (t2 - t1)).sqrt();

        assert_eq!(strategies.len(), 1);
        let Some(fv) = strategies[0].forward_vol() else {
            panic!("expected a forward vol");
        };
        assert!((fv - expected).abs() < 1e-12);
        let Strategy::ForwardVolPair(pair) = strategies[0] else {
            panic!("unexpected shape");
        };
        assert_eq!(pair.near.expiration(), date(1, 16));
        assert_eq!(pair.far.expiration(), date(2, 16));
    }

    #[test]
    fn test_negative_forward_variance_is_omitted() {
        let quotes = vec![
            contract(1, OptionSide::Call, 100.0, 30, 0.40),
            contract(2, OptionSide::Call, 100.0, 60, 0.20),
        ];
        let strategies =
            ForwardVolGenerator.generate(&refs(&quotes), 100.0, &ConstraintSet::default());
        assert!(strategies.is_empty());
    }

    #[test]
    fn test_non_increasing_horizon_is_omitted() {
        // Later date but stale days-to-expiry
        let quotes = vec![
            contract(1, OptionSide::Call, 100.0, 30, 0.20),
            contract(2, OptionSide::Call, 100.0, 30, 0.30),
        ];
        let strategies =
            ForwardVolGenerator.generate(&refs(&quotes), 100.0, &ConstraintSet::default());
        assert!(strategies.is_empty());
    }

    #[test]
    fn test_keys_must_match_side_and_strike() {
        let quotes = vec![
            contract(1, OptionSide::Call, 100.0, 30, 0.20),
            contract(2, OptionSide::Put, 100.0, 60, 0.30),
            contract(2, OptionSide::Call, 105.0, 60, 0.30),
        ];
        let strategies =
            ForwardVolGenerator.generate(&refs(&quotes), 100.0, &ConstraintSet::default());
        assert!(strategies.is_empty());
    }

    #[test]
    fn test_missing_iv_is_skipped() {
        let quotes = vec![
            contract(1, OptionSide::Call, 100.0, 30, 0.20),
            contract(2, OptionSide::Call, 100.0, 60, 0.30).with_iv(None),
        ];
        let strategies =
            ForwardVolGenerator.generate(&refs(&quotes), 100.0, &ConstraintSet::default());
        assert!(strategies.is_empty());
    }

    #[test]
    fn test_expiries_paired_in_date_order_regardless_of_input_order() {
        let quotes = vec![
            contract(3, OptionSide::Put, 95.0, 90, 0.35),
            contract(1, OptionSide::Put, 95.0, 30, 0.20),
            contract(2, OptionSide::Put, 95.0, 60, 0.30),
        ];
        let strategies =
            ForwardVolGenerator.generate(&refs(&quotes), 100.0, &ConstraintSet::default());

        let pairs: Vec<(u32, u32)> = strategies
            .iter()
            .map(|s| match s {
                Strategy::ForwardVolPair(p) => {
                    use chrono::Datelike;
                    (p.near.expiration().month(), p.far.expiration().month())
                }
                _ => panic!("unexpected shape"),
            })
            .collect();
        assert_eq!(pairs, vec![(1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_duplicate_rows_keep_first() {
        let quotes = vec![
            contract(1, OptionSide::Call, 100.0, 30, 0.20),
            contract(1, OptionSide::Call, 100.0, 30, 0.50),
            contract(2, OptionSide::Call, 100.0, 60, 0.30),
        ];
        let strategies =
            ForwardVolGenerator.generate(&refs(&quotes), 100.0, &ConstraintSet::default());

        assert_eq!(strategies.len(), 1);
        let Strategy::ForwardVolPair(pair) = strategies[0] else {
            panic!("unexpected shape");
        };
        assert_eq!(pair.near.iv(), Some(0.20));
    }

    #[test]
    fn test_forward_vol_range_applied() {
        let quotes = vec![
            contract(1, OptionSide::Call, 100.0, 30, 0.20),
            contract(2, OptionSide::Call, 100.0, 60, 0.30),
        ];
        let constraints = ConstraintSet {
            forward_vol_range: Some(Bounds::new(0.0, 0.3)),
            ..ConstraintSet::default()
        };
        let strategies = ForwardVolGenerator.generate(&refs(&quotes), 100.0, &constraints);
        assert!(strategies.is_empty());
    }

    #[test]
    fn test_forward_volatility_degenerate_inputs() {
        assert_eq!(forward_volatility(0.2, 0.5, 0.3, 0.5), None);
        assert_eq!(forward_volatility(0.2, 0.5, 0.3, 0.25), None);
        assert_eq!(forward_volatility(0.3, 0.25, 0.0, 0.5), None);
        let Some(fv) = forward_volatility(0.2, 0.0, 0.2, 1.0) else {
            panic!("flat term structure from zero should be defined");
        };
        assert!((fv - 0.2).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn prop_emitted_pairs_have_increasing_horizon(
            d1 in -5i64..400,
            d2 in -5i64..400,
            iv1 in 0.01f64..2.0,
            iv2 in 0.01f64..2.0,
        ) {
            let quotes = vec![
                contract(1, OptionSide::Call, 100.0, d1, iv1),
                contract(2, OptionSide::Call, 100.0, d2, iv2),
            ];
            let strategies =
                ForwardVolGenerator.generate(&refs(&quotes), 100.0, &ConstraintSet::default());

            for strategy in &strategies {
                let Strategy::ForwardVolPair(pair) = strategy else {
                    panic!("unexpected shape");
                };
                prop_assert!(year_fraction(pair.far) > year_fraction(pair.near));
                prop_assert!(pair.forward_vol.is_finite());
                prop_assert!(pair.forward_vol > 0.0);
            }
        }
    }
}
