use serde::{Deserialize, Serialize};

/// One leaderboard entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateScore {
    /// Entity identifier (e.g. ISO country code).
    pub entity_id: String,
    /// 1-based competition rank; tied scores share the lower number.
    pub rank: usize,
    /// Mean normalized score, rounded to the configured precision.
    pub score: f64,
}

impl AggregateScore {
    pub fn new(entity_id: impl Into<String>, rank: usize, score: f64) -> Self {
        Self {
            entity_id: entity_id.into(),
            rank,
            score,
        }
    }
}

/// Upper bound on rounding precision; finer rounding is meaningless for f64 scores.
pub const MAX_DECIMALS: u32 = 12;

/// Round `value` to `decimals` fractional digits, at most [`MAX_DECIMALS`].
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(MAX_DECIMALS) as i32);
    (value * factor).round() / factor
}
