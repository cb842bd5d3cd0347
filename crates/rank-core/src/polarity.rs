//! Title-based polarity classification.

use serde::{Deserialize, Serialize};

use rank_model::Polarity;

/// Indicators where a lower raw score is better.
pub const DEFAULT_LOWER_IS_BETTER: &[&str] = &["Global Peace Index", "Global Terrorism Index"];

/// Maps dataset titles to their polarity.
///
/// Titles are compared case-insensitively after trimming. Anything not
/// listed is treated as higher-is-better.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolarityRules {
    pub lower_is_better: Vec<String>,
}

impl Default for PolarityRules {
    fn default() -> Self {
        Self {
            lower_is_better: DEFAULT_LOWER_IS_BETTER
                .iter()
                .map(|title| (*title).to_string())
                .collect(),
        }
    }
}

impl PolarityRules {
    /// Rules with no inverted indicators.
    pub fn empty() -> Self {
        Self {
            lower_is_better: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_lower_is_better(mut self, title: impl Into<String>) -> Self {
        self.add_lower_is_better(title);
        self
    }

    pub fn add_lower_is_better(&mut self, title: impl Into<String>) {
        let title = title.into();
        if !self.is_inverted(&title) {
            self.lower_is_better.push(title.trim().to_string());
        }
    }

    pub fn is_inverted(&self, title: &str) -> bool {
        let title = title.trim();
        self.lower_is_better
            .iter()
            .any(|listed| listed.trim().eq_ignore_ascii_case(title))
    }

    pub fn polarity_for(&self, title: &str) -> Polarity {
        if self.is_inverted(title) {
            Polarity::LowerIsBetter
        } else {
            Polarity::HigherIsBetter
        }
    }
}
