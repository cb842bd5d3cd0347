//! Per-entity aggregation and tie-aware ranking.

use std::collections::BTreeMap;

use rank_model::{AggregateScore, round_to};

use crate::collection::DatasetCollection;
use crate::options::RankingOptions;

/// Normalized scores per entity, one contribution per dataset.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    contributions: BTreeMap<String, Vec<f64>>,
}

impl Aggregator {
    /// Collect each entity's normalized score from every dataset holding it.
    ///
    /// Expects a synchronized, normalized collection so that every entity
    /// contributes exactly once per dataset.
    pub fn build(collection: &DatasetCollection) -> Self {
        let mut contributions: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for dataset in collection {
            for record in dataset {
                contributions
                    .entry(record.entity_id().to_string())
                    .or_default()
                    .push(record.normalized_score());
            }
        }
        Self { contributions }
    }

    pub fn len(&self) -> usize {
        self.contributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }

    pub fn contributions(&self, entity_id: &str) -> Option<&[f64]> {
        self.contributions.get(entity_id).map(Vec::as_slice)
    }

    /// Arithmetic mean of an entity's contributions.
    pub fn average(&self, entity_id: &str) -> Option<f64> {
        self.contributions(entity_id).and_then(mean)
    }

    /// Unrounded mean score of every entity with at least one contribution.
    pub fn averages(&self) -> BTreeMap<String, f64> {
        self.contributions
            .iter()
            .filter_map(|(entity, scores)| mean(scores).map(|avg| (entity.clone(), avg)))
            .collect()
    }

    /// Leaderboard sorted by score, best first.
    pub fn rank(&self, options: &RankingOptions) -> Vec<AggregateScore> {
        rank_scores(self.averages(), options.decimals())
    }
}

fn mean(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

/// Rank `(entity, score)` pairs with competition ranking on rounded scores.
///
/// Scores are rounded to `decimals`, capped at
/// [`MAX_DECIMALS`](crate::options::MAX_DECIMALS), before comparison.
/// Entities whose rounded scores are equal share a rank; the next distinct
/// score takes its 1-based position, so `[0.9, 0.9, 0.8]` ranks as
/// `[1, 1, 3]`. Ties are listed by entity id.
pub fn rank_scores<I>(scores: I, decimals: u32) -> Vec<AggregateScore>
where
    I: IntoIterator<Item = (String, f64)>,
{
    let mut rounded: Vec<(String, f64)> = scores
        .into_iter()
        .map(|(entity, score)| (entity, round_to(score, decimals)))
        .collect();
    rounded.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut ranking = Vec::with_capacity(rounded.len());
    let mut rank = 0;
    let mut previous: Option<f64> = None;
    for (position, (entity, score)) in rounded.into_iter().enumerate() {
        if previous != Some(score) {
            rank = position + 1;
            previous = Some(score);
        }
        ranking.push(AggregateScore::new(entity, rank, score));
    }
    ranking
}
