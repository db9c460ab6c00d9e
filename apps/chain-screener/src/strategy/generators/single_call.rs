//! Single OTM call generator.

use crate::config::ConstraintSet;
use crate::options::OptionQuote;
use crate::strategy::types::{Shape, SingleLeg, Strategy};

use super::StrategyGenerator;

/// One single-leg strategy per OTM call: bought when long, sold when short.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleCallGenerator;

impl StrategyGenerator for SingleCallGenerator {
    fn shape(&self) -> Shape {
        Shape::SingleCall
    }

    fn generate<'a>(
        &self,
        options: &[&'a OptionQuote],
        spot: f64,
        constraints: &ConstraintSet,
    ) -> Vec<Strategy<'a>> {
        let direction = constraints.direction_or_default();
        let action = direction.leg_action();

        options
            .iter()
            .filter(|o| o.is_call() && o.is_otm(spot))
            .map(|&option| {
                Strategy::SingleLeg(SingleLeg {
                    option,
                    action,
                    direction,
                })
            })
            .collect()
    }
}
