//! Strategy type definitions and payoff semantics.
//!
//! [`Strategy`] is a closed set of shapes. Every shape borrows its legs from
//! the quote universe and defines the same primitives (debit, credit, max
//! gain, max loss, leg actions); everything else is derived from those.

use serde::{Deserialize, Serialize};

use crate::options::{CONTRACT_MULTIPLIER, NetGreeks, OptionQuote};

use super::leg::{Direction, LegAction, SignedLeg};

/// Strategy family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// One call, bought or sold.
    SingleCall,
    /// Short call spread plus short put spread.
    IronCondor,
    /// Call and put at the same strike.
    Straddle,
    /// OTM call and OTM put.
    Strangle,
    /// Same contract at two expirations (analytic).
    ForwardVol,
}

impl Shape {
    /// Stable identifier used in logs and metric labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleCall => "single_call",
            Self::IronCondor => "iron_condor",
            Self::Straddle => "straddle",
            Self::Strangle => "strangle",
            Self::ForwardVol => "forward_vol",
        }
    }
}

/// One option bought or sold outright.
#[derive(Debug, Clone, Copy)]
pub struct SingleLeg<'a> {
    /// The contract.
    pub option: &'a OptionQuote,
    /// Buy or sell.
    pub action: LegAction,
    /// Requested direction.
    pub direction: Direction,
}

/// Iron condor: short call spread above spot plus short put spread below.
#[derive(Debug, Clone, Copy)]
pub struct IronCondor<'a> {
    /// Sold call (inner, above spot).
    pub short_call: &'a OptionQuote,
    /// Bought call wing (strike above the short call).
    pub buy_call: &'a OptionQuote,
    /// Sold put (inner, below spot).
    pub short_put: &'a OptionQuote,
    /// Bought put wing (strike below the short put).
    pub buy_put: &'a OptionQuote,
    /// Requested direction.
    pub direction: Direction,
}

impl IronCondor<'_> {
    /// Call-side wing width in dollars per contract.
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.buy_call.strike() - self.short_call.strike()) * CONTRACT_MULTIPLIER
    }
}

/// Call and put at the same strike and expiry.
#[derive(Debug, Clone, Copy)]
pub struct Straddle<'a> {
    /// Call leg.
    pub call: &'a OptionQuote,
    /// Put leg.
    pub put: &'a OptionQuote,
    /// Long buys both legs, short sells both.
    pub direction: Direction,
}

/// OTM call and OTM put at the same expiry.
#[derive(Debug, Clone, Copy)]
pub struct Strangle<'a> {
    /// Call leg (strike above spot).
    pub call: &'a OptionQuote,
    /// Put leg (strike below spot).
    pub put: &'a OptionQuote,
    /// Long buys both legs, short sells both.
    pub direction: Direction,
}

/// Forward volatility between two expirations of the same side and strike.
///
/// Not tradeable: every cash-flow primitive is zero.
#[derive(Debug, Clone, Copy)]
pub struct ForwardVolPair<'a> {
    /// Earlier expiration.
    pub near: &'a OptionQuote,
    /// Later expiration.
    pub far: &'a OptionQuote,
    /// Annualised forward volatility between the two expirations.
    pub forward_vol: f64,
}

/// A candidate strategy.
#[derive(Debug, Clone, Copy)]
pub enum Strategy<'a> {
    /// Single option.
    SingleLeg(SingleLeg<'a>),
    /// Four-leg iron condor.
    IronCondor(IronCondor<'a>),
    /// Straddle.
    Straddle(Straddle<'a>),
    /// Strangle.
    Strangle(Strangle<'a>),
    /// Forward volatility pair.
    ForwardVolPair(ForwardVolPair<'a>),
}

impl<'a> Strategy<'a> {
    /// Strategy family.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        match self {
            Self::SingleLeg(_) => Shape::SingleCall,
            Self::IronCondor(_) => Shape::IronCondor,
            Self::Straddle(_) => Shape::Straddle,
            Self::Strangle(_) => Shape::Strangle,
            Self::ForwardVolPair(_) => Shape::ForwardVol,
        }
    }

    /// Direction tag. Forward-vol pairs are analytic and report `Long`.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        match self {
            Self::SingleLeg(s) => s.direction,
            Self::IronCondor(s) => s.direction,
            Self::Straddle(s) => s.direction,
            Self::Strangle(s) => s.direction,
            Self::ForwardVolPair(_) => Direction::Long,
        }
    }

    /// Legs with the action taken on each.
    #[must_use]
    pub fn legs(&self) -> Vec<SignedLeg<'a>> {
        match *self {
            Self::SingleLeg(s) => vec![SignedLeg::new(s.option, s.action)],
            Self::IronCondor(s) => vec![
                SignedLeg::sell(s.short_call),
                SignedLeg::buy(s.buy_call),
                SignedLeg::sell(s.short_put),
                SignedLeg::buy(s.buy_put),
            ],
            Self::Straddle(Straddle {
                call,
                put,
                direction,
            })
            | Self::Strangle(Strangle {
                call,
                put,
                direction,
            }) => {
                let action = direction.leg_action();
                vec![SignedLeg::new(call, action), SignedLeg::new(put, action)]
            }
            Self::ForwardVolPair(s) => vec![SignedLeg::buy(s.near), SignedLeg::buy(s.far)],
        }
    }

    /// Premium paid up front (positive cash out).
    #[must_use]
    pub fn debit(&self) -> f64 {
        match self {
            Self::SingleLeg(s) => match s.action {
                LegAction::Buy => s.option.price() * CONTRACT_MULTIPLIER,
                LegAction::Sell => 0.0,
            },
            Self::IronCondor(s) => (s.buy_call.price() + s.buy_put.price()) * CONTRACT_MULTIPLIER,
            Self::Straddle(Straddle { call, put, direction })
            | Self::Strangle(Strangle { call, put, direction }) => match direction {
                Direction::Long => pair_premium(call, put),
                Direction::Short => 0.0,
            },
            Self::ForwardVolPair(_) => 0.0,
        }
    }

    /// Premium received up front (positive cash in).
    #[must_use]
    pub fn credit(&self) -> f64 {
        match self {
            Self::SingleLeg(s) => match s.action {
                LegAction::Sell => s.option.price() * CONTRACT_MULTIPLIER,
                LegAction::Buy => 0.0,
            },
            Self::IronCondor(s) => {
                (s.short_call.price() + s.short_put.price()) * CONTRACT_MULTIPLIER
            }
            Self::Straddle(Straddle { call, put, direction })
            | Self::Strangle(Strangle { call, put, direction }) => match direction {
                Direction::Short => pair_premium(call, put),
                Direction::Long => 0.0,
            },
            Self::ForwardVolPair(_) => 0.0,
        }
    }

    /// Net cash flow: positive = net debit, negative = net credit.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.debit() - self.credit()
    }

    /// Maximum gain; `f64::INFINITY` when unbounded.
    #[must_use]
    pub fn max_gain(&self) -> f64 {
        match self {
            Self::SingleLeg(s) => {
                if s.option.is_call() && s.action == LegAction::Buy {
                    f64::INFINITY
                } else {
                    s.option.strike() * CONTRACT_MULTIPLIER - self.cost()
                }
            }
            Self::IronCondor(_) => self.credit(),
            Self::Straddle(Straddle { direction, .. })
            | Self::Strangle(Strangle { direction, .. }) => match direction {
                Direction::Long => f64::INFINITY,
                Direction::Short => self.credit(),
            },
            Self::ForwardVolPair(_) => 0.0,
        }
    }

    /// Maximum loss; `f64::INFINITY` when unbounded.
    #[must_use]
    pub fn max_loss(&self) -> f64 {
        match self {
            Self::SingleLeg(_) => self.cost(),
            Self::IronCondor(s) => s.width() - self.credit(),
            Self::Straddle(Straddle { direction, .. })
            | Self::Strangle(Strangle { direction, .. }) => match direction {
                Direction::Long => self.cost(),
                Direction::Short => f64::INFINITY,
            },
            Self::ForwardVolPair(_) => 0.0,
        }
    }

    /// Reward to risk. Structures with no loss (max loss <= 0) rank as
    /// infinite.
    #[must_use]
    pub fn rr(&self) -> f64 {
        let loss = self.max_loss();
        if loss > 0.0 {
            self.max_gain() / loss
        } else {
            f64::INFINITY
        }
    }

    /// Greeks summed over legs, scaled by the contract multiplier and sign.
    #[must_use]
    pub fn net_greeks(&self) -> NetGreeks {
        let mut net = NetGreeks::default();
        for leg in self.legs() {
            net.accumulate(leg.quote.greeks(), CONTRACT_MULTIPLIER * leg.action.sign());
        }
        net
    }

    /// Net position delta.
    #[must_use]
    pub fn net_delta(&self) -> f64 {
        self.net_greeks().delta
    }

    /// Net position gamma.
    #[must_use]
    pub fn net_gamma(&self) -> f64 {
        self.net_greeks().gamma
    }

    /// Net position theta.
    #[must_use]
    pub fn net_theta(&self) -> f64 {
        self.net_greeks().theta
    }

    /// Net position vega.
    #[must_use]
    pub fn net_vega(&self) -> f64 {
        self.net_greeks().vega
    }

    /// Mean IV over legs that quote one.
    #[must_use]
    pub fn avg_iv(&self) -> Option<f64> {
        let ivs: Vec<f64> = self.legs().iter().filter_map(|l| l.quote.iv()).collect();
        if ivs.is_empty() {
            return None;
        }
        Some(ivs.iter().sum::<f64>() / ivs.len() as f64)
    }

    /// Forward volatility for forward-vol pairs.
    #[must_use]
    pub const fn forward_vol(&self) -> Option<f64> {
        match self {
            Self::ForwardVolPair(s) => Some(s.forward_vol),
            _ => None,
        }
    }

    /// Human-readable description.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::SingleLeg(s) => format!(
                "Single {} {}@{} exp {}",
                s.action,
                s.option.side(),
                s.option.strike(),
                s.option.expiration()
            ),
            Self::IronCondor(s) => format!(
                "IC C:{}/{} P:{}/{} exp {}",
                s.short_call.strike(),
                s.buy_call.strike(),
                s.short_put.strike(),
                s.buy_put.strike(),
                s.short_call.expiration()
            ),
            Self::Straddle(s) => format!(
                "Straddle {} C:{} P:{} exp {}",
                s.direction,
                s.call.strike(),
                s.put.strike(),
                s.call.expiration()
            ),
            Self::Strangle(s) => format!(
                "Strangle {} C:{} P:{} exp {}",
                s.direction,
                s.call.strike(),
                s.put.strike(),
                s.call.expiration()
            ),
            Self::ForwardVolPair(s) => format!(
                "FwdVol {}@{} {}->{} fv={:.4}",
                s.near.side(),
                s.near.strike(),
                s.near.expiration(),
                s.far.expiration(),
                s.forward_vol
            ),
        }
    }
}

impl std::fmt::Display for Strategy<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Combined premium of a call/put pair, per contract.
fn pair_premium(call: &OptionQuote, put: &OptionQuote) -> f64 {
    (call.price() + put.price()) * CONTRACT_MULTIPLIER
}
