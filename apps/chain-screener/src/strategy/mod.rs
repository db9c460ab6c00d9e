//! Candidate strategies and the generators that enumerate them.
//!
//! - `leg`: direction and per-leg buy/sell actions
//! - `types`: the closed [`Strategy`] enum and its payoff contract
//! - `generators`: one [`StrategyGenerator`] per shape plus the registry

mod generators;
mod leg;
mod types;

pub use generators::{
    DAYS_PER_YEAR, ForwardVolGenerator, IronCondorGenerator, SingleCallGenerator,
    StraddleGenerator, StrangleGenerator, StrategyGenerator, forward_volatility, registry,
};
pub use leg::{Direction, LegAction, SignedLeg};
pub use types::{ForwardVolPair, IronCondor, Shape, SingleLeg, Straddle, Strangle, Strategy};
