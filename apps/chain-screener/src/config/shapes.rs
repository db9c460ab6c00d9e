//! Selection of strategy families to generate.

use serde::{Deserialize, Serialize};

use crate::strategy::Shape;

/// Which strategy families a run generates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeSelector {
    /// Single OTM calls.
    pub single_calls: bool,
    /// Iron condors.
    pub iron_condors: bool,
    /// Straddles.
    pub straddles: bool,
    /// Strangles.
    pub strangles: bool,
    /// Forward-volatility pairs.
    pub forward_vols: bool,
}

impl ShapeSelector {
    /// Select every family.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            single_calls: true,
            iron_condors: true,
            straddles: true,
            strangles: true,
            forward_vols: true,
        }
    }

    /// Whether `shape` is selected.
    #[must_use]
    pub const fn is_enabled(&self, shape: Shape) -> bool {
        match shape {
            Shape::SingleCall => self.single_calls,
            Shape::IronCondor => self.iron_condors,
            Shape::Straddle => self.straddles,
            Shape::Strangle => self.strangles,
            Shape::ForwardVol => self.forward_vols,
        }
    }

    /// Whether any family is selected.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.single_calls || self.iron_condors || self.straddles || self.strangles || self.forward_vols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_flags_default_to_false() {
        let selector: ShapeSelector =
            serde_json::from_str(r#"{"single_calls": true, "straddles": false}"#).unwrap();
        assert!(selector.is_enabled(Shape::SingleCall));
        assert!(!selector.is_enabled(Shape::Straddle));
        assert!(!selector.is_enabled(Shape::ForwardVol));
        assert!(selector.any());
        assert!(!ShapeSelector::default().any());
    }
}
