//! Iron condor generator.
//!
//! For each expiration, every short call above spot is combined with every
//! higher-strike call wing, every short put below spot and every
//! lower-strike put wing. The enumeration is quartic in bucket size and is
//! the dominant cost of a screening run.

use crate::config::ConstraintSet;
use crate::options::OptionQuote;
use crate::strategy::types::{IronCondor, Shape, Strategy};

use super::{StrategyGenerator, group_by_expiry};

/// Full cross product of call spreads and put spreads per expiration.
#[derive(Debug, Clone, Copy, Default)]
pub struct IronCondorGenerator;

impl StrategyGenerator for IronCondorGenerator {
    fn shape(&self) -> Shape {
        Shape::IronCondor
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
            let calls = &chain.calls;
            let puts = &chain.puts;

            // Both lists are sorted by strike, so every "strike above" set is
            // a suffix and every "strike below" set is a prefix.
            let put_spreads: Vec<(&'a OptionQuote, &[&'a OptionQuote])> = puts
                .iter()
                .filter(|p| p.strike() < spot)
                .map(|&short_put| {
                    let wings = puts.partition_point(|p| p.strike() < short_put.strike());
                    (short_put, &puts[..wings])
                })
                .collect();

            for &short_call in calls.iter().filter(|c| c.strike() > spot) {
                let first_wing = calls.partition_point(|c| c.strike() <= short_call.strike());

                for &buy_call in &calls[first_wing..] {
                    for &(short_put, put_wings) in &put_spreads {
                        for &buy_put in put_wings {
                            strategies.push(Strategy::IronCondor(IronCondor {
                                short_call,
                                buy_call,
                                short_put,
                                buy_put,
                                direction,
                            }));
                        }
                    }
                }
            }
        }

        strategies
    }
}
