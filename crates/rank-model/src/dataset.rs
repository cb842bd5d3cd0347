//! Indicator datasets and their normalization policy.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::record::Record;

/// Direction in which an indicator's raw scores improve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Larger raw scores are better (e.g. prosperity indices).
    #[default]
    HigherIsBetter,
    /// Smaller raw scores are better (e.g. peace or terrorism indices).
    LowerIsBetter,
}

impl Polarity {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::HigherIsBetter => "higher is better",
            Self::LowerIsBetter => "lower is better",
        }
    }

    #[must_use]
    pub const fn is_inverted(&self) -> bool {
        matches!(self, Self::LowerIsBetter)
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of a dataset within a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatasetKey {
    pub title: String,
    pub period: i32,
}

impl DatasetKey {
    pub fn new(title: impl Into<String>, period: i32) -> Self {
        Self {
            title: title.into(),
            period,
        }
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.period)
    }
}

/// Result of normalizing a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NormalizationOutcome {
    /// Dataset had no records.
    Empty,
    /// Every record shares the same raw score; normalized scores stay at 0.0.
    Degenerate { value: f64 },
    /// Records were min-max scaled between `worst` (0.0) and `best` (1.0).
    Scaled { best: f64, worst: f64 },
    /// Dataset had been normalized before; nothing changed.
    AlreadyNormalized,
}

/// A titled, period-stamped collection of records for one indicator.
#[derive(Debug, Clone)]
pub struct Dataset {
    title: String,
    period: i32,
    polarity: Polarity,
    records: Vec<Record>,
    entities: BTreeSet<String>,
    normalization: Option<NormalizationOutcome>,
}

impl Dataset {
    pub fn new(title: impl Into<String>, period: i32, polarity: Polarity) -> Self {
        Self {
            title: title.into(),
            period,
            polarity,
            records: Vec::new(),
            entities: BTreeSet::new(),
            normalization: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn period(&self) -> i32 {
        self.period
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn key(&self) -> DatasetKey {
        DatasetKey::new(self.title.clone(), self.period)
    }

    /// True when `(title, period)` identifies this dataset.
    pub fn matches(&self, title: &str, period: i32) -> bool {
        self.period == period && self.title == title
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Outcome of the normalization pass, if it has run.
    pub fn normalization(&self) -> Option<NormalizationOutcome> {
        self.normalization
    }

    /// Append a record.
    ///
    /// A second record for an entity already present is rejected and the
    /// first one is kept.
    pub fn add_record(&mut self, record: Record) -> Result<()> {
        if self.normalization.is_some() {
            return Err(ModelError::DatasetNormalized(self.key()));
        }
        if self.entities.contains(record.entity_id()) {
            return Err(ModelError::DuplicateEntity {
                entity_id: record.entity_id().to_string(),
                dataset: self.key(),
            });
        }
        self.entities.insert(record.entity_id().to_string());
        self.records.push(record);
        Ok(())
    }

    pub fn get_record(&self, entity_id: &str) -> Option<&Record> {
        self.records
            .iter()
            .find(|record| record.entity_id() == entity_id)
    }

    pub fn contains(&self, entity_id: &str) -> bool {
        self.entities.contains(entity_id)
    }

    /// Snapshot of every entity id in the dataset.
    pub fn entity_ids(&self) -> BTreeSet<String> {
        self.entities.clone()
    }

    /// Drop every record whose entity is not in `allowed`.
    ///
    /// Returns the number of records removed.
    pub fn remove_not_in(&mut self, allowed: &BTreeSet<String>) -> usize {
        let before = self.records.len();
        self.records
            .retain(|record| allowed.contains(record.entity_id()));
        self.entities.retain(|entity| allowed.contains(entity));
        before - self.records.len()
    }

    /// Scale raw scores onto `[0, 1]` so that 1.0 is always the best score.
    ///
    /// Runs at most once per dataset. Empty datasets and datasets whose
    /// scores are all equal leave every normalized score at 0.0.
    pub fn normalize(&mut self) -> NormalizationOutcome {
        if self.normalization.is_some() {
            return NormalizationOutcome::AlreadyNormalized;
        }
        let outcome = self.scale_records();
        self.normalization = Some(outcome);
        outcome
    }

    fn scale_records(&mut self) -> NormalizationOutcome {
        let Some((min, max)) = score_bounds(&self.records) else {
            return NormalizationOutcome::Empty;
        };
        if min == max {
            return NormalizationOutcome::Degenerate { value: min };
        }
        let (best, worst) = match self.polarity {
            Polarity::LowerIsBetter => (min, max),
            Polarity::HigherIsBetter => (max, min),
        };
        // Ranges wider than f64::MAX are measured on halved values.
        let halve = !(best - worst).is_finite();
        let shift = |value: f64| if halve { value / 2.0 } else { value };
        let span = (shift(best) - shift(worst)).abs();
        for record in &mut self.records {
            let distance = (shift(record.raw_score()) - shift(worst)).abs();
            record.mark_normalized((distance / span).min(1.0));
        }
        NormalizationOutcome::Scaled { best, worst }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn score_bounds(records: &[Record]) -> Option<(f64, f64)> {
    let first = records.first()?.raw_score();
    Some(
        records
            .iter()
            .map(Record::raw_score)
            .fold((first, first), |(min, max), score| {
                (min.min(score), max.max(score))
            }),
    )
}
