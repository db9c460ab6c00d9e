//! Leg actions and strategy direction.

use serde::{Deserialize, Serialize};

use crate::options::OptionQuote;

/// Strategy direction requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Buy premium (pay a debit).
    #[default]
    Long,
    /// Sell premium (collect a credit).
    Short,
}

impl Direction {
    /// Parse a direction case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("long") {
            Some(Self::Long)
        } else if value.eq_ignore_ascii_case("short") {
            Some(Self::Short)
        } else {
            None
        }
    }

    /// Action taken on legs of a symmetric structure in this direction.
    #[must_use]
    pub const fn leg_action(self) -> LegAction {
        match self {
            Self::Long => LegAction::Buy,
            Self::Short => LegAction::Sell,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
        }
    }
}

/// Whether a leg is bought or sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegAction {
    /// Bought (long the contract).
    Buy,
    /// Sold (short the contract).
    Sell,
}

impl LegAction {
    /// +1 for bought legs, -1 for sold legs.
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Buy => 1.0,
            Self::Sell => -1.0,
        }
    }
}

impl std::fmt::Display for LegAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// A borrowed quote paired with the action taken on it.
#[derive(Debug, Clone, Copy)]
pub struct SignedLeg<'a> {
    /// The quoted contract.
    pub quote: &'a OptionQuote,
    /// Buy or sell.
    pub action: LegAction,
}

impl<'a> SignedLeg<'a> {
    /// Pair a quote with an action.
    #[must_use]
    pub const fn new(quote: &'a OptionQuote, action: LegAction) -> Self {
        Self { quote, action }
    }

    /// Bought leg.
    #[must_use]
    pub const fn buy(quote: &'a OptionQuote) -> Self {
        Self::new(quote, LegAction::Buy)
    }

    /// Sold leg.
    #[must_use]
    pub const fn sell(quote: &'a OptionQuote) -> Self {
        Self::new(quote, LegAction::Sell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse("LONG"), Some(Direction::Long));
        assert_eq!(Direction::parse("short"), Some(Direction::Short));
        assert_eq!(Direction::parse("sideways"), None);
    }

    #[test]
    fn test_leg_action_sign() {
        assert_eq!(LegAction::Buy.sign(), 1.0);
        assert_eq!(LegAction::Sell.sign(), -1.0);
        assert_eq!(Direction::Short.leg_action(), LegAction::Sell);
    }
}
