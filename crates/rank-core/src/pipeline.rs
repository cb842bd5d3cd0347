//! Ranking pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Synchronize**: restrict every dataset to entities covered by all
//! 2. **Normalize**: scale each dataset onto `[0, 1]`, best = 1.0
//! 3. **Aggregate**: average each entity's normalized scores
//! 4. **Rank**: competition ranking on rounded scores
//!
//! Synchronization must finish before normalization starts, since the
//! min/max of each dataset is taken over the synchronized records.

use std::time::Instant;

use tracing::{debug, info, info_span, warn};

use rank_model::{
    AggregateScore, Anomaly, AnomalyKind, DatasetKey, Diagnostics, NormalizationOutcome,
};

use crate::aggregate::Aggregator;
use crate::collection::DatasetCollection;
use crate::options::RankingOptions;

/// Everything a ranking run produces.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutcome {
    /// Leaderboard, best first.
    pub ranking: Vec<AggregateScore>,
    /// Entities dropped for lacking full dataset coverage, sorted.
    pub excluded: Vec<String>,
    /// Normalization result per dataset, in collection order.
    pub normalization: Vec<(DatasetKey, NormalizationOutcome)>,
    /// Data-quality anomalies raised by the run.
    pub diagnostics: Diagnostics,
}

impl PipelineOutcome {
    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }
}

/// Synchronize, normalize, aggregate and rank a loaded collection.
///
/// Never fails: an empty collection yields an empty ranking plus an
/// `EmptyCollection` anomaly.
pub fn run_pipeline(
    collection: &mut DatasetCollection,
    options: &RankingOptions,
) -> PipelineOutcome {
    let mut outcome = PipelineOutcome::default();

    let sync_start = Instant::now();
    let sync = info_span!("synchronize", datasets = collection.len())
        .in_scope(|| collection.synchronize());
    info!(
        common = sync.common.len(),
        excluded = sync.excluded.len(),
        removed_records = sync.removed_records,
        duration_ms = sync_start.elapsed().as_millis(),
        "synchronize complete"
    );
    for entity in &sync.excluded {
        outcome.diagnostics.push(
            Anomaly::new(
                AnomalyKind::ExcludedEntity,
                "missing from at least one dataset",
            )
            .with_entity(entity.clone()),
        );
    }
    outcome.excluded = sync.excluded;

    if let Err(error) = collection.check_coverage() {
        let message = if collection.is_empty() {
            "no datasets loaded".to_string()
        } else {
            format!("{error} across {} datasets", collection.len())
        };
        warn!(%message, "nothing to rank");
        outcome
            .diagnostics
            .push(Anomaly::new(AnomalyKind::EmptyCollection, message));
        return outcome;
    }

    let normalize_start = Instant::now();
    outcome.normalization = info_span!("normalize").in_scope(|| collection.normalize());
    for (key, result) in &outcome.normalization {
        debug!(dataset = %key, ?result, "normalized dataset");
        if let NormalizationOutcome::Degenerate { value } = result {
            outcome.diagnostics.push(
                Anomaly::new(
                    AnomalyKind::DegenerateNormalization,
                    format!("all scores equal {value}; normalized scores left at 0.0"),
                )
                .with_dataset(key.clone()),
            );
        }
    }
    info!(
        datasets = outcome.normalization.len(),
        duration_ms = normalize_start.elapsed().as_millis(),
        "normalize complete"
    );

    let rank_start = Instant::now();
    outcome.ranking = info_span!("rank", decimals = options.decimals()).in_scope(|| {
        let aggregator = Aggregator::build(collection);
        aggregator.rank(options)
    });
    info!(
        entities = outcome.ranking.len(),
        duration_ms = rank_start.elapsed().as_millis(),
        "rank complete"
    );
    outcome
}
