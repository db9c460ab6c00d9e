//! Ranking parameters for a screening run.

use serde::{Deserialize, Serialize};

use crate::screening::RankKey;

/// How results are ordered and truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Ranking key: `rr`, `gain`, `loss` or `cost`. Anything else keeps
    /// generation order.
    #[serde(default = "default_rank_key")]
    pub key: String,
    /// Number of results to keep.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            key: default_rank_key(),
            top_n: default_top_n(),
        }
    }
}

impl RankingConfig {
    /// Parsed ranking key.
    #[must_use]
    pub fn rank_key(&self) -> RankKey {
        RankKey::parse(&self.key)
    }
}

fn default_rank_key() -> String {
    "rr".to_string()
}

const fn default_top_n() -> usize {
    10
}
