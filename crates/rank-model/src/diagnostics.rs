//! Data-quality anomalies collected while the pipeline runs.
//!
//! Nothing in this module aborts a run: rejected rows, duplicate records,
//! excluded entities and degenerate datasets are all recorded here and
//! reported next to the ranking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::DatasetKey;
use crate::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    /// Record failed validation (empty id, non-finite score).
    InvalidRecord,
    /// Second record for an entity already present in a dataset.
    DuplicateEntity,
    /// Source row could not be parsed.
    RejectedRow,
    /// Entity is not on the reference list.
    UnrecognizedEntity,
    /// Entity lacks coverage in at least one dataset.
    ExcludedEntity,
    /// Every raw score in a dataset is equal.
    DegenerateNormalization,
    /// Nothing left to rank.
    EmptyCollection,
}

impl AnomalyKind {
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::InvalidRecord | Self::RejectedRow => Severity::Error,
            Self::DuplicateEntity | Self::EmptyCollection => Severity::Warning,
            Self::UnrecognizedEntity | Self::ExcludedEntity | Self::DegenerateNormalization => {
                Severity::Info
            }
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRecord => "invalid_record",
            Self::DuplicateEntity => "duplicate_entity",
            Self::RejectedRow => "rejected_row",
            Self::UnrecognizedEntity => "unrecognized_entity",
            Self::ExcludedEntity => "excluded_entity",
            Self::DegenerateNormalization => "degenerate_normalization",
            Self::EmptyCollection => "empty_collection",
        }
    }
}

/// A single recorded anomaly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub kind: AnomalyKind,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    pub message: String,
}

impl Anomaly {
    pub fn new(kind: AnomalyKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            dataset: None,
            entity_id: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_dataset(mut self, dataset: DatasetKey) -> Self {
        self.dataset = Some(dataset);
        self
    }

    #[must_use]
    pub fn with_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Classify a model error raised while loading a record.
    pub fn from_model_error(error: &ModelError, dataset: &DatasetKey) -> Self {
        let kind = match error {
            ModelError::DuplicateEntity { .. } => AnomalyKind::DuplicateEntity,
            ModelError::EmptyCollection => AnomalyKind::EmptyCollection,
            _ => AnomalyKind::InvalidRecord,
        };
        let anomaly = Self::new(kind, error.to_string()).with_dataset(dataset.clone());
        match error {
            ModelError::NonFiniteScore { entity_id, .. }
            | ModelError::DuplicateEntity { entity_id, .. } => anomaly.with_entity(entity_id.clone()),
            _ => anomaly,
        }
    }
}

/// Ordered list of anomalies with severity counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub anomalies: Vec<Anomaly>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, anomaly: Anomaly) {
        self.anomalies.push(anomaly);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.anomalies.extend(other.anomalies);
    }

    pub fn len(&self) -> usize {
        self.anomalies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anomalies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Anomaly> {
        self.anomalies.iter()
    }

    pub fn error_count(&self) -> usize {
        self.count_severity(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count_severity(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count_severity(Severity::Info)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn count_kind(&self, kind: AnomalyKind) -> usize {
        self.anomalies.iter().filter(|a| a.kind == kind).count()
    }

    /// Number of anomalies per kind, in kind order.
    pub fn by_kind(&self) -> BTreeMap<AnomalyKind, usize> {
        let mut counts = BTreeMap::new();
        for anomaly in &self.anomalies {
            *counts.entry(anomaly.kind).or_insert(0) += 1;
        }
        counts
    }

    fn count_severity(&self, severity: Severity) -> usize {
        self.anomalies
            .iter()
            .filter(|a| a.severity == severity)
            .count()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Anomaly;
    type IntoIter = std::slice::Iter<'a, Anomaly>;

    fn into_iter(self) -> Self::IntoIter {
        self.anomalies.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_counts() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Anomaly::new(AnomalyKind::RejectedRow, "bad row"));
        diagnostics.push(Anomaly::new(AnomalyKind::DuplicateEntity, "dup"));
        diagnostics.push(Anomaly::new(AnomalyKind::ExcludedEntity, "partial").with_entity("XK"));
        diagnostics.push(Anomaly::new(AnomalyKind::ExcludedEntity, "partial").with_entity("TW"));

        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.warning_count(), 1);
        assert_eq!(diagnostics.info_count(), 2);
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.count_kind(AnomalyKind::ExcludedEntity), 2);
        assert_eq!(diagnostics.by_kind().get(&AnomalyKind::ExcludedEntity), Some(&2));
    }

    #[test]
    fn test_from_duplicate_error() {
        let key = DatasetKey::new("Global Peace Index", 2021);
        let error = ModelError::DuplicateEntity {
            entity_id: "FR".to_string(),
            dataset: key.clone(),
        };
        let anomaly = Anomaly::from_model_error(&error, &key);
        assert_eq!(anomaly.kind, AnomalyKind::DuplicateEntity);
        assert_eq!(anomaly.severity, Severity::Warning);
        assert_eq!(anomaly.entity_id.as_deref(), Some("FR"));
        assert_eq!(anomaly.dataset, Some(key));
    }

    #[test]
    fn test_from_validation_error() {
        let key = DatasetKey::new("Global Peace Index", 2021);
        let anomaly = Anomaly::from_model_error(&ModelError::EmptyEntityId, &key);
        assert_eq!(anomaly.kind, AnomalyKind::InvalidRecord);
        assert_eq!(anomaly.severity, Severity::Error);
        assert!(anomaly.entity_id.is_none());
    }

    #[test]
    fn test_skips_empty_optional_fields() {
        let anomaly = Anomaly::new(AnomalyKind::EmptyCollection, "nothing to rank");
        let json = serde_json::to_string(&anomaly).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"empty_collection","severity":"warning","message":"nothing to rank"}"#
        );
    }
}
