//! Straddle generator: call and put at an identical strike.

use crate::config::ConstraintSet;
use crate::options::OptionQuote;
use crate::strategy::types::{Shape, Straddle, Strategy};

use super::{StrategyGenerator, group_by_expiry};

/// Pairs every call with every put at exactly the same strike and expiry.
///
/// Duplicate quote rows at one strike each produce their own pairing.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraddleGenerator;

impl StrategyGenerator for StraddleGenerator {
    fn shape(&self) -> Shape {
        Shape::Straddle
    }

    fn generate<'a>(
        &self,
        options: &[&'a OptionQuote],
        _spot: f64,
        constraints: &ConstraintSet,
    ) -> Vec<Strategy<'a>> {
        let direction = constraints.direction_or_default();
        let mut strategies = Vec::new();

        for chain in group_by_expiry(options) {
            for &call in &chain.calls {
                let start = chain.puts.partition_point(|p| p.strike() < call.strike());
                for &put in chain.puts[start..]
                    .iter()
                    .take_while(|p| p.strike() == call.strike())
                {
                    strategies.push(Strategy::Straddle(Straddle {
                        call,
                        put,
                        direction,
                    }));
                }
            }
        }

        strategies
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{call, date, put, quote, refs};
    use super::*;
    use crate::options::OptionSide;
    use crate::strategy::Direction;

    fn strikes(strategies: &[Strategy<'_>]) -> Vec<(f64, f64)> {
        strategies
            .iter()
            .map(|s| match s {
                Strategy::Straddle(st) => (st.call.strike(), st.put.strike()),
                _ => panic!("unexpected shape"),
            })
            .collect()
    }

    #[test]
    fn test_pairs_equal_strikes_only() {
        let quotes = vec![
            call(100.0, 3.0),
            call(105.0, 1.0),
            put(100.0, 2.5),
            put(95.0, 1.0),
        ];
        let strategies =
            StraddleGenerator.generate(&refs(&quotes), 100.0, &ConstraintSet::default());
        assert_eq!(strikes(&strategies), vec![(100.0, 100.0)]);
        assert_eq!(strategies[0].debit(), 550.0);
    }

    #[test]
    fn test_duplicate_rows_each_pair() {
        let quotes = vec![
            call(100.0, 3.0),
            call(100.0, 3.1),
            put(100.0, 2.5),
            put(100.0, 2.6),
        ];
        let strategies =
            StraddleGenerator.generate(&refs(&quotes), 100.0, &ConstraintSet::default());
        assert_eq!(strategies.len(), 4);
    }

    #[test]
    fn test_expirations_are_not_mixed() {
        let quotes = vec![
            call(100.0, 3.0),
            quote(date(2, 20), OptionSide::Put, 100.0, 2.5),
        ];
        let strategies =
            StraddleGenerator.generate(&refs(&quotes), 100.0, &ConstraintSet::default());
        assert!(strategies.is_empty());
    }

    #[test]
    fn test_short_direction_collects_credit() {
        let quotes = vec![call(100.0, 3.0), put(100.0, 2.0)];
        let constraints = ConstraintSet {
            direction: Some(Direction::Short),
            ..ConstraintSet::default()
        };
        let strategies = StraddleGenerator.generate(&refs(&quotes), 100.0, &constraints);

        assert_eq!(strategies[0].direction(), Direction::Short);
        assert_eq!(strategies[0].debit(), 0.0);
        assert_eq!(strategies[0].credit(), 500.0);
    }
}
