//! Bar chart input series.

use serde::Serialize;

use rank_model::AggregateScore;

/// Labels and scores in bottom-to-top order for a horizontal bar chart.
///
/// The best entity comes last so it is drawn at the top.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

impl ChartSeries {
    pub fn from_ranking(ranking: &[AggregateScore]) -> Self {
        let (labels, scores) = ranking
            .iter()
            .rev()
            .map(|entry| (entry.entity_id.clone(), entry.score))
            .unzip();
        Self { labels, scores }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.scores.iter().copied())
    }
}
