//! Single per-entity observations.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Normalization state of a record.
///
/// Records start `Unnormalized` and move to `Normalized` exactly once, when
/// their owning dataset scales its scores.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ScoreState {
    #[default]
    Unnormalized,
    Normalized(f64),
}

/// One `(entity, raw score)` observation inside a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    entity_id: String,
    raw_score: f64,
    state: ScoreState,
}

impl Record {
    /// Create a record, rejecting empty identifiers and non-finite scores.
    ///
    /// Surrounding whitespace is trimmed from the identifier. Negative scores
    /// are accepted; only the indicator's own scale gives them meaning.
    pub fn new(entity_id: impl Into<String>, raw_score: f64) -> Result<Self> {
        let entity_id = entity_id.into().trim().to_string();
        if entity_id.is_empty() {
            return Err(ModelError::EmptyEntityId);
        }
        if !raw_score.is_finite() {
            return Err(ModelError::NonFiniteScore {
                entity_id,
                value: raw_score,
            });
        }
        Ok(Self {
            entity_id,
            raw_score,
            state: ScoreState::Unnormalized,
        })
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn raw_score(&self) -> f64 {
        self.raw_score
    }

    pub fn state(&self) -> ScoreState {
        self.state
    }

    pub fn is_normalized(&self) -> bool {
        matches!(self.state, ScoreState::Normalized(_))
    }

    /// Normalized score in `[0, 1]`, or `0.0` before normalization.
    pub fn normalized_score(&self) -> f64 {
        match self.state {
            ScoreState::Normalized(value) => value,
            ScoreState::Unnormalized => 0.0,
        }
    }

    pub(crate) fn mark_normalized(&mut self, value: f64) {
        debug_assert!(!self.is_normalized(), "record normalized twice");
        self.state = ScoreState::Normalized(value);
    }
}
