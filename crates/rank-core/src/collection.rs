//! Ownership and reconciliation of every loaded dataset.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use rank_ingest::ObservationRow;
use rank_model::{
    Anomaly, Dataset, DatasetKey, Diagnostics, ModelError, NormalizationOutcome, Record,
};

use crate::polarity::PolarityRules;

/// Entity sets before and after synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Entities present in every dataset.
    pub common: BTreeSet<String>,
    /// Entities seen in at least one dataset but not in all, sorted.
    pub excluded: Vec<String>,
    /// Records dropped across all datasets.
    pub removed_records: usize,
}

/// Every dataset taking part in a ranking run, keyed by `(title, period)`.
#[derive(Debug, Clone, Default)]
pub struct DatasetCollection {
    datasets: Vec<Dataset>,
}

impl DatasetCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Dataset> {
        self.datasets.iter()
    }

    /// Register a dataset; its `(title, period)` must be new.
    pub fn add_dataset(&mut self, dataset: Dataset) -> Result<(), ModelError> {
        if self.get_dataset(dataset.title(), dataset.period()).is_some() {
            return Err(ModelError::DuplicateDataset(dataset.key()));
        }
        self.datasets.push(dataset);
        Ok(())
    }

    pub fn get_dataset(&self, title: &str, period: i32) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.matches(title, period))
    }

    /// Group observation rows into datasets.
    ///
    /// A dataset is created on the first valid record for its
    /// `(title, period)`; its polarity comes from `rules`. Invalid records and
    /// duplicate entities are reported and skipped.
    pub fn load<I>(&mut self, rows: I, rules: &PolarityRules) -> Diagnostics
    where
        I: IntoIterator<Item = ObservationRow>,
    {
        let mut diagnostics = Diagnostics::new();
        for row in rows {
            let key = DatasetKey::new(row.title.trim(), row.period);
            let record = match Record::new(row.entity_id, row.raw_score) {
                Ok(record) => record,
                Err(error) => {
                    warn!(dataset = %key, %error, "rejected record");
                    diagnostics.push(Anomaly::from_model_error(&error, &key));
                    continue;
                }
            };
            let dataset = self.dataset_entry(&key, rules);
            if let Err(error) = dataset.add_record(record) {
                warn!(dataset = %key, %error, "skipped record");
                diagnostics.push(Anomaly::from_model_error(&error, &key));
            }
        }
        debug!(
            datasets = self.datasets.len(),
            anomalies = diagnostics.len(),
            "loaded observation rows"
        );
        diagnostics
    }

    fn dataset_entry(&mut self, key: &DatasetKey, rules: &PolarityRules) -> &mut Dataset {
        let position = match self
            .datasets
            .iter()
            .position(|d| d.matches(&key.title, key.period))
        {
            Some(position) => position,
            None => {
                let polarity = rules.polarity_for(&key.title);
                debug!(dataset = %key, %polarity, "created dataset");
                self.datasets
                    .push(Dataset::new(key.title.clone(), key.period, polarity));
                self.datasets.len() - 1
            }
        };
        &mut self.datasets[position]
    }

    /// Entities present in at least one dataset.
    pub fn entity_union(&self) -> BTreeSet<String> {
        self.datasets
            .iter()
            .flat_map(|d| d.iter().map(|r| r.entity_id().to_string()))
            .collect()
    }

    /// Entities present in every dataset; `None` when there are no datasets.
    pub fn common_entities(&self) -> Option<BTreeSet<String>> {
        let (first, rest) = self.datasets.split_first()?;
        Some(rest.iter().fold(first.entity_ids(), |common, dataset| {
            common
                .into_iter()
                .filter(|entity| dataset.contains(entity))
                .collect()
        }))
    }

    /// Number of distinct entities across all datasets.
    pub fn entity_count(&self) -> usize {
        self.entity_union().len()
    }

    /// True when every dataset holds the same entity set.
    pub fn is_synchronized(&self) -> bool {
        match self.datasets.split_first() {
            Some((first, rest)) => {
                let ids = first.entity_ids();
                rest.iter().all(|d| d.entity_ids() == ids)
            }
            None => true,
        }
    }

    /// Restrict every dataset to the entities present in all of them.
    ///
    /// Entities with partial coverage are excluded rather than imputed. An
    /// empty collection is left untouched.
    pub fn synchronize(&mut self) -> SyncReport {
        let Some(common) = self.common_entities() else {
            return SyncReport::default();
        };
        let union = self.entity_union();
        let removed_records = self
            .datasets
            .iter_mut()
            .map(|dataset| dataset.remove_not_in(&common))
            .sum();
        let excluded = union.difference(&common).cloned().collect();
        SyncReport {
            common,
            excluded,
            removed_records,
        }
    }

    /// Normalize every dataset independently.
    pub fn normalize(&mut self) -> Vec<(DatasetKey, NormalizationOutcome)> {
        self.datasets
            .iter_mut()
            .map(|dataset| (dataset.key(), dataset.normalize()))
            .collect()
    }

    /// Fails with [`ModelError::EmptyCollection`] when nothing can be ranked.
    pub fn check_coverage(&self) -> Result<(), ModelError> {
        match self.common_entities() {
            Some(common) if !common.is_empty() => Ok(()),
            _ => Err(ModelError::EmptyCollection),
        }
    }
}

impl<'a> IntoIterator for &'a DatasetCollection {
    type Item = &'a Dataset;
    type IntoIter = std::slice::Iter<'a, Dataset>;

    fn into_iter(self) -> Self::IntoIter {
        self.datasets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rank_model::{AnomalyKind, Polarity};

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn collection(rows: &[(&str, &str, f64)]) -> DatasetCollection {
        let mut collection = DatasetCollection::new();
        let rows = rows
            .iter()
            .map(|(title, entity, score)| ObservationRow::new(*title, 2020, *entity, *score));
        let diagnostics = collection.load(rows, &PolarityRules::default());
        assert!(diagnostics.is_empty());
        collection
    }

    #[test]
    fn test_load_groups_rows_by_title_and_period() {
        let mut collection = DatasetCollection::new();
        let rows = vec![
            ObservationRow::new("Global Peace Index", 2020, "AT", 1.3),
            ObservationRow::new("Global Peace Index", 2021, "AT", 1.2),
            ObservationRow::new("Prosperity", 2020, "AT", 70.0),
            ObservationRow::new("Global Peace Index", 2020, "BE", 1.5),
        ];
        collection.load(rows, &PolarityRules::default());

        assert_eq!(collection.len(), 3);
        let peace = collection.get_dataset("Global Peace Index", 2020).unwrap();
        assert_eq!(peace.len(), 2);
        assert_eq!(peace.polarity(), Polarity::LowerIsBetter);
        assert_eq!(
            collection.get_dataset("Prosperity", 2020).unwrap().polarity(),
            Polarity::HigherIsBetter
        );
        assert!(collection.get_dataset("Prosperity", 1999).is_none());
    }

    #[test]
    fn test_load_reports_invalid_and_duplicate_records() {
        let mut collection = DatasetCollection::new();
        let rows = vec![
            ObservationRow::new("Peace", 2020, "AT", 1.0),
            ObservationRow::new("Peace", 2020, "AT", 2.0),
            ObservationRow::new("Peace", 2020, "BE", f64::NAN),
            ObservationRow::new("Peace", 2020, "  ", 3.0),
        ];
        let diagnostics = collection.load(rows, &PolarityRules::default());

        assert_eq!(diagnostics.count_kind(AnomalyKind::DuplicateEntity), 1);
        assert_eq!(diagnostics.count_kind(AnomalyKind::InvalidRecord), 2);
        let peace = collection.get_dataset("Peace", 2020).unwrap();
        assert_eq!(peace.len(), 1);
        assert_eq!(peace.get_record("AT").map(Record::raw_score), Some(1.0));
    }

    #[test]
    fn test_invalid_first_record_does_not_create_dataset() {
        let mut collection = DatasetCollection::new();
        let rows = vec![ObservationRow::new("Peace", 2020, "AT", f64::INFINITY)];
        collection.load(rows, &PolarityRules::default());
        assert!(collection.is_empty());
    }

    #[test]
    fn test_add_dataset_rejects_duplicate_identity() {
        let mut collection = DatasetCollection::new();
        collection
            .add_dataset(Dataset::new("Peace", 2020, Polarity::LowerIsBetter))
            .unwrap();
        let err = collection
            .add_dataset(Dataset::new("Peace", 2020, Polarity::HigherIsBetter))
            .unwrap_err();
        assert_eq!(err, ModelError::DuplicateDataset(DatasetKey::new("Peace", 2020)));
        collection
            .add_dataset(Dataset::new("Peace", 2021, Polarity::LowerIsBetter))
            .unwrap();
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_synchronize_intersects_entities() {
        let mut collection = collection(&[
            ("A", "X", 1.0),
            ("A", "Y", 2.0),
            ("A", "Z", 3.0),
            ("B", "Y", 1.0),
            ("B", "Z", 2.0),
            ("B", "W", 3.0),
        ]);
        let report = collection.synchronize();

        assert_eq!(report.common, ids(&["Y", "Z"]));
        assert_eq!(report.excluded, vec!["W".to_string(), "X".to_string()]);
        assert_eq!(report.removed_records, 2);
        for dataset in &collection {
            assert_eq!(dataset.entity_ids(), ids(&["Y", "Z"]));
        }
        assert!(collection.is_synchronized());
    }

    #[test]
    fn test_synchronize_is_idempotent() {
        let mut collection = collection(&[
            ("A", "X", 1.0),
            ("A", "Y", 2.0),
            ("B", "Y", 1.0),
            ("B", "W", 3.0),
        ]);
        let first = collection.synchronize();
        let second = collection.synchronize();
        assert_eq!(first.common, second.common);
        assert!(second.excluded.is_empty());
        assert_eq!(second.removed_records, 0);
    }

    #[test]
    fn test_synchronize_empty_collection_is_noop() {
        let mut collection = DatasetCollection::new();
        assert_eq!(collection.synchronize(), SyncReport::default());
        assert!(collection.is_synchronized());
        assert_eq!(collection.check_coverage(), Err(ModelError::EmptyCollection));
    }

    #[test]
    fn test_disjoint_datasets_leave_nothing_to_rank() {
        let mut collection = collection(&[("A", "X", 1.0), ("B", "Y", 1.0)]);
        let report = collection.synchronize();
        assert!(report.common.is_empty());
        assert_eq!(collection.len(), 2);
        assert!(collection.iter().all(Dataset::is_empty));
        assert_eq!(collection.check_coverage(), Err(ModelError::EmptyCollection));
    }

    #[test]
    fn test_normalize_reports_each_dataset() {
        let mut collection = collection(&[
            ("A", "X", 1.0),
            ("A", "Y", 2.0),
            ("B", "X", 5.0),
            ("B", "Y", 5.0),
        ]);
        let outcomes = collection.normalize();
        assert_eq!(
            outcomes,
            vec![
                (
                    DatasetKey::new("A", 2020),
                    NormalizationOutcome::Scaled { best: 2.0, worst: 1.0 }
                ),
                (
                    DatasetKey::new("B", 2020),
                    NormalizationOutcome::Degenerate { value: 5.0 }
                ),
            ]
        );
    }
}
