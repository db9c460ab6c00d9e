//! Strangle generator: OTM call with OTM put.

use crate::config::ConstraintSet;
use crate::options::OptionQuote;
use crate::strategy::types::{Shape, Strangle, Strategy};

use super::{StrategyGenerator, group_by_expiry};

/// Cross product of OTM calls and OTM puts within each expiration.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrangleGenerator;

impl StrategyGenerator for StrangleGenerator {
    fn shape(&self) -> Shape {
        Shape::Strangle
    }

    fn generate<'a>(
        &self,
        options: &[&'a OptionQuote],
        spot: f64,
        constraints: &ConstraintSet,
    ) -> Vec<Strategy<'a>> {
        let direction = constraints.direction_or_default();
        let mut strategies = Vec::new();

        for chain in group_by_expiry(options) {
            let otm_puts: Vec<&'a OptionQuote> = chain
                .puts
                .iter()
                .copied()
                .filter(|p| p.is_otm(spot))
                .collect();

            for &call in chain.calls.iter().filter(|c| c.is_otm(spot)) {
                strategies.extend(otm_puts.iter().map(|&put| {
                    Strategy::Strangle(Strangle {
                        call,
                        put,
                        direction,
                    })
                }));
            }
        }

        strategies
    }
}
