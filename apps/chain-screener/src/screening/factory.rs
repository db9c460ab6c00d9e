//! Orchestrates one screening run over a quote universe.

use std::time::Instant;

use crate::config::{ConstraintSet, ShapeSelector};
use crate::error::ScreenerError;
use crate::observability::{record_candidates_generated, record_generation_time};
use crate::options::OptionQuote;
use crate::strategy::{Strategy, StrategyGenerator, registry};

use super::{OptionFilter, StrategyFilter};

/// Owns the universe and spot for a run and dispatches the generators.
pub struct StrategyFactory<'a> {
    options: &'a [OptionQuote],
    spot: f64,
    generators: Vec<Box<dyn StrategyGenerator>>,
}

impl std::fmt::Debug for StrategyFactory<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyFactory")
            .field("options", &self.options.len())
            .field("spot", &self.spot)
            .finish_non_exhaustive()
    }
}

impl<'a> StrategyFactory<'a> {
    /// Create a factory over `options` at `spot`.
    #[must_use]
    pub fn new(options: &'a [OptionQuote], spot: f64) -> Self {
        Self {
            options,
            spot,
            generators: registry(),
        }
    }

    /// Underlying spot price.
    #[must_use]
    pub const fn spot(&self) -> f64 {
        self.spot
    }

    /// Generate and filter candidates for every selected shape.
    ///
    /// Candidates are returned unranked, in registration order: single
    /// calls, iron condors, straddles, strangles, forward-vol pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenerError::Config`] if `constraints` fail validation;
    /// nothing is generated in that case.
    pub fn generate(
        &self,
        shapes: &ShapeSelector,
        constraints: &ConstraintSet,
    ) -> Result<Vec<Strategy<'a>>, ScreenerError> {
        constraints.validate()?;

        let pool = OptionFilter::new(self.spot, constraints).apply(self.options);

        let mut candidates = Vec::new();
        for generator in &self.generators {
            let shape = generator.shape();
            if !shapes.is_enabled(shape) {
                continue;
            }

            let started = Instant::now();
            let generated = generator.generate(&pool, self.spot, constraints);
            let elapsed = started.elapsed().as_secs_f64();

            record_candidates_generated(shape.as_str(), generated.len());
            record_generation_time(shape.as_str(), elapsed);
            tracing::debug!(
                shape = shape.as_str(),
                count = generated.len(),
                elapsed_ms = elapsed * 1000.0,
                "Generated candidates"
            );

            candidates.extend(generated);
        }

        let generated = candidates.len();
        let strategies = StrategyFilter::new(constraints).apply(candidates);

        tracing::info!(
            options = self.options.len(),
            pool = pool.len(),
            generated,
            accepted = strategies.len(),
            "Screening complete"
        );

        Ok(strategies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Bounds, ConfigError};
    use crate::options::OptionSide;
    use crate::screening::{RankKey, rank, top};
    use crate::strategy::{Direction, LegAction, Shape};
    use chrono::NaiveDate;

    fn quote(side: OptionSide, strike: f64, mid: f64) -> OptionQuote {
        OptionQuote::new("SPY", NaiveDate::from_ymd_opt(2026, 1, 16).unwrap(), strike, side)
            .unwrap()
            .with_mid(Some(mid))
    }

    #[test]
    fn test_single_otm_call_long() {
        let universe = vec![quote(OptionSide::Call, 100.0, 2.0)];
        let shapes = ShapeSelector {
            single_calls: true,
            ..ShapeSelector::default()
        };
        let factory = StrategyFactory::new(&universe, 95.0);
        let strategies = factory
            .generate(&shapes, &ConstraintSet::default())
            .unwrap();

        assert_eq!(strategies.len(), 1);
        let Strategy::SingleLeg(leg) = strategies[0] else {
            panic!("expected a single leg");
        };
        assert_eq!(leg.action, LegAction::Buy);
        assert_eq!(strategies[0].cost(), 200.0);
        assert_eq!(strategies[0].max_gain(), f64::INFINITY);
        assert_eq!(strategies[0].max_loss(), 200.0);
    }

    #[test]
    fn test_zero_debit_short_straddle_passes_debit_range() {
        let universe = vec![
            quote(OptionSide::Call, 100.0, 3.0),
            quote(OptionSide::Put, 100.0, 2.0),
        ];
        let shapes = ShapeSelector {
            straddles: true,
            ..ShapeSelector::default()
        };
        let factory = StrategyFactory::new(&universe, 100.0);

        let debit_only = ConstraintSet {
            direction: Some(Direction::Short),
            debit_range: Some(Bounds::new(0.0, 0.0)),
            ..ConstraintSet::default()
        };
        let strategies = factory.generate(&shapes, &debit_only).unwrap();
        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].debit(), 0.0);

        let with_credit = ConstraintSet {
            credit_range: Some(Bounds::new(0.0, 400.0)),
            ..debit_only
        };
        assert!(factory.generate(&shapes, &with_credit).unwrap().is_empty());
    }

    #[test]
    fn test_empty_universe_is_not_an_error() {
        let factory = StrategyFactory::new(&[], 100.0);
        let mut strategies = factory
            .generate(&ShapeSelector::all(), &ConstraintSet::default())
            .unwrap();
        assert!(strategies.is_empty());

        rank(&mut strategies, RankKey::Rr);
        assert!(top(&strategies, 5).is_empty());
    }

    #[test]
    fn test_invalid_constraints_fail_before_generation() {
        let universe = vec![quote(OptionSide::Call, 100.0, 2.0)];
        let constraints = ConstraintSet {
            rr_range: Some(Bounds::new(2.0, 1.0)),
            ..ConstraintSet::default()
        };
        let result = StrategyFactory::new(&universe, 95.0).generate(&ShapeSelector::all(), &constraints);
        assert!(matches!(
            result,
            Err(ScreenerError::Config(ConfigError::ValidationError(_)))
        ));
    }

    #[test]
    fn test_registration_order_across_shapes() {
        let universe = vec![
            quote(OptionSide::Call, 100.0, 3.0),
            quote(OptionSide::Call, 105.0, 1.0),
            quote(OptionSide::Call, 110.0, 0.5),
            quote(OptionSide::Put, 100.0, 2.0),
            quote(OptionSide::Put, 95.0, 1.0),
            quote(OptionSide::Put, 90.0, 0.5),
        ];
        let strategies = StrategyFactory::new(&universe, 100.0)
            .generate(&ShapeSelector::all(), &ConstraintSet::default())
            .unwrap();

        let shapes: Vec<Shape> = strategies.iter().map(Strategy::shape).collect();
        let mut sorted = shapes.clone();
        sorted.sort_by_key(|s| match s {
            Shape::SingleCall => 0,
            Shape::IronCondor => 1,
            Shape::Straddle => 2,
            Shape::Strangle => 3,
            Shape::ForwardVol => 4,
        });
        assert_eq!(shapes, sorted);
        // 2 single calls, 1 condor, 1 straddle, 4 strangles
        assert_eq!(strategies.len(), 8);
    }

    #[test]
    fn test_disabled_shapes_are_skipped() {
        let universe = vec![
            quote(OptionSide::Call, 105.0, 1.0),
            quote(OptionSide::Put, 95.0, 1.0),
        ];
        let shapes = ShapeSelector {
            strangles: true,
            ..ShapeSelector::default()
        };
        let strategies = StrategyFactory::new(&universe, 100.0)
            .generate(&shapes, &ConstraintSet::default())
            .unwrap();
        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].shape(), Shape::Strangle);
    }

    #[test]
    fn test_option_filter_runs_before_generation() {
        let universe = vec![
            quote(OptionSide::Call, 105.0, 1.0).with_liquidity(5, 100),
            quote(OptionSide::Call, 110.0, 0.5).with_liquidity(50, 100),
        ];
        let shapes = ShapeSelector {
            single_calls: true,
            ..ShapeSelector::default()
        };
        let constraints = ConstraintSet {
            min_volume: Some(10),
            ..ConstraintSet::default()
        };
        let strategies = StrategyFactory::new(&universe, 100.0)
            .generate(&shapes, &constraints)
            .unwrap();
        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].label(), "Single BUY CALL@110 exp 2026-01-16");
    }
}
