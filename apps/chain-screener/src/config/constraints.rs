//! Screening constraints applied to quotes and to constructed strategies.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::strategy::Direction;

use super::ConfigError;

/// Inclusive `[min, max]` range, written as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds<T> {
    /// Lower bound (inclusive).
    pub min: T,
    /// Upper bound (inclusive).
    pub max: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    /// Create a range.
    #[must_use]
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies within the range, bounds included.
    #[must_use]
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// Like [`contains`](Self::contains), but an absent value never matches.
    #[must_use]
    pub fn contains_opt(&self, value: Option<T>) -> bool {
        value.is_some_and(|v| self.contains(v))
    }
}

impl<T: PartialOrd + Copy + std::fmt::Display> Bounds<T> {
    /// Reject ranges whose minimum is above the maximum (or incomparable).
    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        if self.min <= self.max {
            Ok(())
        } else {
            Err(ConfigError::ValidationError(format!(
                "{field}: min {} must not exceed max {}",
                self.min, self.max
            )))
        }
    }
}

impl<T: Serialize> Serialize for Bounds<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.min, &self.max).serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Bounds<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (min, max) = <(T, T)>::deserialize(deserializer)?;
        Ok(Self { min, max })
    }
}

/// Option-level and strategy-level constraints.
///
/// Every field is optional; `None` leaves that dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintSet {
    // ==================== OPTION-LEVEL ====================
    /// Minimum traded volume.
    pub min_volume: Option<u64>,
    /// Minimum open interest.
    #[serde(alias = "min_oi")]
    pub min_open_interest: Option<u64>,
    /// Minimum premium.
    pub min_price: Option<f64>,
    /// Maximum premium.
    pub max_price: Option<f64>,
    /// Strike range.
    #[serde(alias = "strikes_range")]
    pub strike_range: Option<Bounds<f64>>,
    /// Only this expiration.
    pub expiry: Option<NaiveDate>,
    /// Days-to-expiry range.
    pub days_to_expiry_range: Option<Bounds<i64>>,
    /// Minimum implied volatility.
    pub min_iv: Option<f64>,
    /// Minimum absolute delta.
    #[serde(alias = "min_delta")]
    pub min_abs_delta: Option<f64>,
    /// Maximum absolute gamma.
    #[serde(alias = "max_gamma")]
    pub max_abs_gamma: Option<f64>,
    /// Volume / open-interest range (screens out volume spikes).
    pub volume_ratio_range: Option<Bounds<f64>>,
    /// Maximum bid/ask spread.
    pub max_bid_ask_spread: Option<f64>,

    // ==================== STRATEGY-LEVEL ====================
    /// Direction for generated structures. Defaults to long.
    #[serde(deserialize_with = "deserialize_direction")]
    pub direction: Option<Direction>,
    /// Debit range, checked only for strategies that pay a debit.
    pub debit_range: Option<Bounds<f64>>,
    /// Credit range, checked only for strategies that collect a credit.
    pub credit_range: Option<Bounds<f64>>,
    /// Max-gain range.
    #[serde(alias = "potential_gain_range")]
    pub max_gain_range: Option<Bounds<f64>>,
    /// Max-loss range.
    #[serde(alias = "potential_loss_range")]
    pub max_loss_range: Option<Bounds<f64>>,
    /// Reward:risk range.
    pub rr_range: Option<Bounds<f64>>,
    /// Net delta range.
    pub net_delta_range: Option<Bounds<f64>>,
    /// Net theta range.
    pub net_theta_range: Option<Bounds<f64>>,
    /// Net vega range.
    pub net_vega_range: Option<Bounds<f64>>,
    /// Average IV range.
    pub iv_range: Option<Bounds<f64>>,
    /// Forward volatility range for forward-vol pairs.
    pub forward_vol_range: Option<Bounds<f64>>,
}

impl ConstraintSet {
    /// Direction to generate, long unless configured otherwise.
    #[must_use]
    pub fn direction_or_default(&self) -> Direction {
        self.direction.unwrap_or_default()
    }

    /// Check that every configured value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_scalar("min_price", self.min_price)?;
        validate_scalar("max_price", self.max_price)?;
        validate_scalar("min_iv", self.min_iv)?;
        validate_scalar("min_abs_delta", self.min_abs_delta)?;
        validate_scalar("max_abs_gamma", self.max_abs_gamma)?;
        validate_scalar("max_bid_ask_spread", self.max_bid_ask_spread)?;

        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            Bounds::new(min, max).validate("min_price/max_price")?;
        }

        let ranges = [
            ("strike_range", self.strike_range),
            ("volume_ratio_range", self.volume_ratio_range),
            ("debit_range", self.debit_range),
            ("credit_range", self.credit_range),
            ("max_gain_range", self.max_gain_range),
            ("max_loss_range", self.max_loss_range),
            ("rr_range", self.rr_range),
            ("net_delta_range", self.net_delta_range),
            ("net_theta_range", self.net_theta_range),
            ("net_vega_range", self.net_vega_range),
            ("iv_range", self.iv_range),
            ("forward_vol_range", self.forward_vol_range),
        ];
        for (field, range) in ranges {
            if let Some(range) = range {
                range.validate(field)?;
            }
        }

        if let Some(range) = self.days_to_expiry_range {
            range.validate("days_to_expiry_range")?;
        }

        Ok(())
    }
}

/// Scalar thresholds must be non-negative numbers.
fn validate_scalar(field: &str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        Some(v) if v.is_nan() || v < 0.0 => Err(ConfigError::ValidationError(format!(
            "{field} must be a non-negative number, got {v}"
        ))),
        _ => Ok(()),
    }
}

fn deserialize_direction<'de, D>(deserializer: D) -> Result<Option<Direction>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|value| {
        Direction::parse(&value).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid direction '{value}', expected LONG or SHORT"
            ))
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_inclusive() {
        let range = Bounds::new(1.0, 2.0);
        assert!(range.contains(1.0));
        assert!(range.contains(2.0));
        assert!(!range.contains(2.000_001));
        assert!(!range.contains_opt(None));
        assert!(range.contains_opt(Some(1.5)));
    }

    #[test]
    fn test_default_is_unconstrained_and_valid() {
        let constraints = ConstraintSet::default();
        assert!(constraints.validate().is_ok());
        assert_eq!(constraints.direction_or_default(), Direction::Long);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let constraints = ConstraintSet {
            rr_range: Some(Bounds::new(3.0, 1.0)),
            ..ConstraintSet::default()
        };
        let Err(err) = constraints.validate() else {
            panic!("expected inverted range to be rejected");
        };
        assert!(err.to_string().contains("rr_range"));
    }

    #[test]
    fn test_inverted_days_range_rejected() {
        let constraints = ConstraintSet {
            days_to_expiry_range: Some(Bounds::new(60, 30)),
            ..ConstraintSet::default()
        };
        assert!(constraints.validate().is_err());
    }

    #[test]
    fn test_nan_bound_rejected() {
        let constraints = ConstraintSet {
            iv_range: Some(Bounds::new(f64::NAN, 1.0)),
            ..ConstraintSet::default()
        };
        assert!(constraints.validate().is_err());
    }

    #[test]
    fn test_min_price_above_max_price_rejected() {
        let constraints = ConstraintSet {
            min_price: Some(5.0),
            max_price: Some(1.0),
            ..ConstraintSet::default()
        };
        assert!(constraints.validate().is_err());
    }

    #[test]
    fn test_negative_spread_ceiling_rejected() {
        let constraints = ConstraintSet {
            max_bid_ask_spread: Some(-0.1),
            ..ConstraintSet::default()
        };
        assert!(constraints.validate().is_err());
    }

    #[test]
    fn test_deserialize_legacy_names() {
        let json = r#"{
            "min_oi": 50,
            "potential_gain_range": [100, 1000],
            "potential_loss_range": null,
            "days_to_expiry_range": [7, 45],
            "direction": "short",
            "expiry": "2026-01-16"
        }"#;

        let constraints: ConstraintSet = serde_json::from_str(json).unwrap();
        assert_eq!(constraints.min_open_interest, Some(50));
        assert_eq!(constraints.max_gain_range, Some(Bounds::new(100.0, 1000.0)));
        assert_eq!(constraints.max_loss_range, None);
        assert_eq!(constraints.days_to_expiry_range, Some(Bounds::new(7, 45)));
        assert_eq!(constraints.direction, Some(Direction::Short));
        assert_eq!(constraints.expiry, NaiveDate::from_ymd_opt(2026, 1, 16));
    }

    #[test]
    fn test_deserialize_rejects_unknown_direction() {
        let result: Result<ConstraintSet, _> = serde_json::from_str(r#"{"direction": "FLAT"}"#);
        assert!(result.is_err());
    }
}
