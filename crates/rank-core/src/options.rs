use serde::{Deserialize, Serialize};

pub use rank_model::MAX_DECIMALS;

/// Decimal places used for reported scores and tie detection.
pub const DEFAULT_DECIMALS: u32 = 3;

/// Options controlling how aggregated scores are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingOptions {
    decimals: u32,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl RankingOptions {
    /// Precision is capped at [`MAX_DECIMALS`].
    pub fn new(decimals: u32) -> Self {
        Self {
            decimals: decimals.min(MAX_DECIMALS),
        }
    }

    /// Scores are rounded to this many decimals before tie comparison.
    pub fn decimals(&self) -> u32 {
        self.decimals.min(MAX_DECIMALS)
    }
}
