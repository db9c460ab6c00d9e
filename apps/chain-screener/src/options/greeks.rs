//! Greeks carried on a quote and their aggregation across strategy legs.
//!
//! Greeks are inputs from the market-data provider. Any of them may be
//! missing on a given row; aggregation treats a missing value as zero.

use serde::{Deserialize, Serialize};

/// Greeks for a single quoted contract (per share, as quoted).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta - rate of change of option price with respect to underlying price.
    pub delta: Option<f64>,
    /// Gamma - rate of change of delta with respect to underlying price.
    pub gamma: Option<f64>,
    /// Theta - rate of change of option price with respect to time (per day).
    pub theta: Option<f64>,
    /// Vega - sensitivity to implied volatility.
    pub vega: Option<f64>,
    /// Rho - sensitivity to interest rate changes.
    pub rho: Option<f64>,
}

impl Greeks {
    /// Create Greeks with every sensitivity present.
    #[must_use]
    pub const fn new(delta: f64, gamma: f64, theta: f64, vega: f64, rho: f64) -> Self {
        Self {
            delta: Some(delta),
            gamma: Some(gamma),
            theta: Some(theta),
            vega: Some(vega),
            rho: Some(rho),
        }
    }

    /// Greeks with nothing quoted.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            delta: None,
            gamma: None,
            theta: None,
            vega: None,
            rho: None,
        }
    }
}

/// Position-level Greeks summed over signed legs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetGreeks {
    /// Net delta.
    pub delta: f64,
    /// Net gamma.
    pub gamma: f64,
    /// Net theta.
    pub theta: f64,
    /// Net vega.
    pub vega: f64,
}

impl NetGreeks {
    /// Add one leg's Greeks scaled by `quantity` (contracts × multiplier × sign).
    ///
    /// A missing Greek contributes nothing.
    pub fn accumulate(&mut self, greeks: &Greeks, quantity: f64) {
        self.delta += greeks.delta.unwrap_or(0.0) * quantity;
        self.gamma += greeks.gamma.unwrap_or(0.0) * quantity;
        self.theta += greeks.theta.unwrap_or(0.0) * quantity;
        self.vega += greeks.vega.unwrap_or(0.0) * quantity;
    }
}
