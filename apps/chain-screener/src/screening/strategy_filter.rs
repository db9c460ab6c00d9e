//! Strategy-level filter applied to constructed candidates.

use crate::config::ConstraintSet;
use crate::strategy::Strategy;

/// Applies the strategy-level half of a [`ConstraintSet`].
///
/// The debit range only constrains strategies that pay a debit, and the
/// credit range only those that collect a credit. Every other configured
/// range always applies; an undefined average IV fails `iv_range`.
#[derive(Debug, Clone, Copy)]
pub struct StrategyFilter<'c> {
    constraints: &'c ConstraintSet,
}

impl<'c> StrategyFilter<'c> {
    /// Create a filter over `constraints`.
    #[must_use]
    pub const fn new(constraints: &'c ConstraintSet) -> Self {
        Self { constraints }
    }

    /// Whether `strategy` passes every configured strategy-level range.
    #[must_use]
    pub fn accepts(&self, strategy: &Strategy<'_>) -> bool {
        let c = self.constraints;

        let debit = strategy.debit();
        if debit > 0.0 && c.debit_range.is_some_and(|r| !r.contains(debit)) {
            return false;
        }
        let credit = strategy.credit();
        if credit > 0.0 && c.credit_range.is_some_and(|r| !r.contains(credit)) {
            return false;
        }

        let ranges = [
            (c.max_gain_range, strategy.max_gain()),
            (c.max_loss_range, strategy.max_loss()),
            (c.rr_range, strategy.rr()),
        ];
        if ranges
            .iter()
            .any(|(range, value)| range.is_some_and(|r| !r.contains(*value)))
        {
            return false;
        }

        if c.net_delta_range.is_some()
            || c.net_theta_range.is_some()
            || c.net_vega_range.is_some()
        {
            let net = strategy.net_greeks();
            let greeks = [
                (c.net_delta_range, net.delta),
                (c.net_theta_range, net.theta),
                (c.net_vega_range, net.vega),
            ];
            if greeks
                .iter()
                .any(|(range, value)| range.is_some_and(|r| !r.contains(*value)))
            {
                return false;
            }
        }

        if c.iv_range.is_some_and(|r| !r.contains_opt(strategy.avg_iv())) {
            return false;
        }

        true
    }

    /// Keep the strategies that pass, preserving order.
    #[must_use]
    pub fn apply<'a>(&self, strategies: Vec<Strategy<'a>>) -> Vec<Strategy<'a>> {
        let before = strategies.len();
        let kept: Vec<Strategy<'a>> = strategies
            .into_iter()
            .filter(|s| self.accepts(s))
            .collect();

        tracing::debug!(
            kept = kept.len(),
            rejected = before - kept.len(),
            "Applied strategy filter"
        );
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Bounds;
    use crate::options::{Greeks, OptionQuote, OptionSide};
    use crate::strategy::{Direction, Straddle};
    use chrono::NaiveDate;
    use test_case::test_case;

    fn quote(side: OptionSide, strike: f64, mid: f64) -> OptionQuote {
        OptionQuote::new("SPY", NaiveDate::from_ymd_opt(2026, 1, 16).unwrap(), strike, side)
            .unwrap()
            .with_mid(Some(mid))
    }

    fn straddle<'a>(call: &'a OptionQuote, put: &'a OptionQuote, direction: Direction) -> Strategy<'a> {
        Strategy::Straddle(Straddle {
            call,
            put,
            direction,
        })
    }

    #[test]
    fn test_zero_debit_is_exempt_from_debit_range() {
        let call = quote(OptionSide::Call, 100.0, 3.0);
        let put = quote(OptionSide::Put, 100.0, 2.0);
        let short = straddle(&call, &put, Direction::Short);
        let constraints = ConstraintSet {
            debit_range: Some(Bounds::new(10.0, 20.0)),
            ..ConstraintSet::default()
        };
        assert!(StrategyFilter::new(&constraints).accepts(&short));
    }

    #[test]
    fn test_positive_debit_is_checked() {
        let call = quote(OptionSide::Call, 100.0, 3.0);
        let put = quote(OptionSide::Put, 100.0, 2.0);
        let long = straddle(&call, &put, Direction::Long);
        let constraints = ConstraintSet {
            debit_range: Some(Bounds::new(0.0, 400.0)),
            ..ConstraintSet::default()
        };
        assert!(!StrategyFilter::new(&constraints).accepts(&long));
    }

    #[test_case(Direction::Long, Some(Bounds::new(0.0, 100.0)), true ; "long has no credit to check")]
    #[test_case(Direction::Short, Some(Bounds::new(0.0, 100.0)), false ; "short credit outside range")]
    #[test_case(Direction::Short, Some(Bounds::new(500.0, 500.0)), true ; "short credit on range edge")]
    fn test_credit_range(direction: Direction, credit_range: Option<Bounds<f64>>, expected: bool) {
        let call = quote(OptionSide::Call, 100.0, 3.0);
        let put = quote(OptionSide::Put, 100.0, 2.0);
        let strategy = straddle(&call, &put, direction);
        let constraints = ConstraintSet {
            credit_range,
            ..ConstraintSet::default()
        };
        assert_eq!(StrategyFilter::new(&constraints).accepts(&strategy), expected);
    }

    #[test]
    fn test_unbounded_loss_fails_finite_loss_range() {
        let call = quote(OptionSide::Call, 100.0, 3.0);
        let put = quote(OptionSide::Put, 100.0, 2.0);
        let short = straddle(&call, &put, Direction::Short);
        let constraints = ConstraintSet {
            max_loss_range: Some(Bounds::new(0.0, 1_000_000.0)),
            ..ConstraintSet::default()
        };
        assert!(!StrategyFilter::new(&constraints).accepts(&short));
    }

    #[test]
    fn test_net_delta_range() {
        let call = quote(OptionSide::Call, 100.0, 3.0).with_greeks(Greeks {
            delta: Some(0.5),
            ..Greeks::empty()
        });
        let put = quote(OptionSide::Put, 100.0, 2.0).with_greeks(Greeks {
            delta: Some(-0.45),
            ..Greeks::empty()
        });
        let long = straddle(&call, &put, Direction::Long);

        let tight = ConstraintSet {
            net_delta_range: Some(Bounds::new(-1.0, 1.0)),
            ..ConstraintSet::default()
        };
        assert!(!StrategyFilter::new(&tight).accepts(&long));

        let loose = ConstraintSet {
            net_delta_range: Some(Bounds::new(-10.0, 10.0)),
            ..ConstraintSet::default()
        };
        assert!(StrategyFilter::new(&loose).accepts(&long));
    }

    #[test]
    fn test_missing_iv_fails_iv_range() {
        let call = quote(OptionSide::Call, 100.0, 3.0);
        let put = quote(OptionSide::Put, 100.0, 2.0);
        let long = straddle(&call, &put, Direction::Long);
        let constraints = ConstraintSet {
            iv_range: Some(Bounds::new(0.0, 5.0)),
            ..ConstraintSet::default()
        };
        assert!(!StrategyFilter::new(&constraints).accepts(&long));
    }

    #[test]
    fn test_apply_preserves_order() {
        let call = quote(OptionSide::Call, 100.0, 3.0);
        let put = quote(OptionSide::Put, 100.0, 2.0);
        let candidates = vec![
            straddle(&call, &put, Direction::Short),
            straddle(&call, &put, Direction::Long),
            straddle(&call, &put, Direction::Short),
        ];
        let constraints = ConstraintSet {
            max_gain_range: Some(Bounds::new(0.0, 1000.0)),
            ..ConstraintSet::default()
        };
        let kept = StrategyFilter::new(&constraints).apply(candidates);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|s| s.direction() == Direction::Short));
    }
}
