//! Combined analysis document with run metadata.

use chrono::{DateTime, Utc};
use serde::Serialize;

use rank_model::{AggregateScore, Anomaly, Dataset, Diagnostics, NormalizationOutcome, Polarity};

/// One dataset as it took part in the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub title: String,
    pub period: i32,
    pub polarity: Polarity,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalization: Option<NormalizationOutcome>,
}

impl From<&Dataset> for DatasetSummary {
    fn from(dataset: &Dataset) -> Self {
        Self {
            title: dataset.title().to_string(),
            period: dataset.period(),
            polarity: dataset.polarity(),
            records: dataset.len(),
            normalization: dataset.normalization(),
        }
    }
}

/// Results, excluded entities and anomalies of one ranking run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub decimals: u32,
    pub datasets: Vec<DatasetSummary>,
    pub results: Vec<AggregateScore>,
    pub excluded: Vec<String>,
    pub anomalies: Vec<Anomaly>,
}

impl AnalysisReport {
    pub fn new(generated_at: DateTime<Utc>, decimals: u32) -> Self {
        Self {
            generated_at,
            decimals,
            datasets: Vec::new(),
            results: Vec::new(),
            excluded: Vec::new(),
            anomalies: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_datasets<'a, I>(mut self, datasets: I) -> Self
    where
        I: IntoIterator<Item = &'a Dataset>,
    {
        self.datasets = datasets.into_iter().map(DatasetSummary::from).collect();
        self
    }

    #[must_use]
    pub fn with_results(mut self, results: Vec<AggregateScore>) -> Self {
        self.results = results;
        self
    }

    #[must_use]
    pub fn with_excluded(mut self, excluded: Vec<String>) -> Self {
        self.excluded = excluded;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: &Diagnostics) -> Self {
        self.anomalies = diagnostics.iter().cloned().collect();
        self
    }
}
