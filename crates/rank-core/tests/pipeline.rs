//! End-to-end tests for the ranking pipeline.

use proptest::prelude::*;

use rank_core::{
    DatasetCollection, PolarityRules, RankingOptions, rank_scores, run_pipeline,
};
use rank_ingest::ObservationRow;
use rank_model::{AnomalyKind, NormalizationOutcome};

fn rows(title: &str, scores: &[(&str, f64)]) -> Vec<ObservationRow> {
    scores
        .iter()
        .map(|(entity, score)| ObservationRow::new(title, 2020, *entity, *score))
        .collect()
}

fn load(rows: Vec<ObservationRow>, rules: &PolarityRules) -> DatasetCollection {
    let mut collection = DatasetCollection::new();
    let diagnostics = collection.load(rows, rules);
    assert!(diagnostics.is_empty(), "unexpected anomalies: {diagnostics:?}");
    collection
}

fn ranked(outcome: &rank_core::PipelineOutcome) -> Vec<(&str, usize, f64)> {
    outcome
        .ranking
        .iter()
        .map(|entry| (entry.entity_id.as_str(), entry.rank, entry.score))
        .collect()
}

#[test]
fn opposite_polarities_balance_out() {
    let rules = PolarityRules::empty().with_lower_is_better("Peace Index");
    let mut input = rows("Peace Index", &[("A", 1.0), ("B", 2.0), ("C", 3.0)]);
    input.extend(rows("Prosperity Index", &[("A", 10.0), ("B", 20.0), ("C", 30.0)]));
    let mut collection = load(input, &rules);

    let outcome = run_pipeline(&mut collection, &RankingOptions::default());

    assert_eq!(
        ranked(&outcome),
        vec![("A", 1, 0.5), ("B", 1, 0.5), ("C", 1, 0.5)]
    );
    assert!(outcome.excluded.is_empty());
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn partially_covered_entities_are_excluded() {
    let rules = PolarityRules::empty().with_lower_is_better("Peace Index");
    let mut input = rows("Peace Index", &[("A", 1.0), ("B", 2.0), ("C", 3.0)]);
    input.extend(rows("Prosperity Index", &[("A", 10.0), ("B", 40.0)]));
    let mut collection = load(input, &rules);

    let outcome = run_pipeline(&mut collection, &RankingOptions::default());

    assert_eq!(outcome.excluded, vec!["C".to_string()]);
    assert_eq!(outcome.diagnostics.count_kind(AnomalyKind::ExcludedEntity), 1);
    assert_eq!(ranked(&outcome), vec![("A", 1, 0.5), ("B", 1, 0.5)]);
    assert!(outcome.ranking.iter().all(|entry| entry.entity_id != "C"));
}

#[test]
fn normalization_uses_synchronized_records() {
    // W is the dataset maximum before synchronization but must not set the scale.
    let mut input = rows("Alpha", &[("X", 0.0), ("Y", 5.0), ("W", 100.0)]);
    input.extend(rows("Beta", &[("X", 0.0), ("Y", 10.0)]));
    let mut collection = load(input, &PolarityRules::empty());

    let outcome = run_pipeline(&mut collection, &RankingOptions::default());

    assert_eq!(ranked(&outcome), vec![("Y", 1, 1.0), ("X", 2, 0.0)]);
    assert_eq!(
        outcome.normalization[0].1,
        NormalizationOutcome::Scaled { best: 5.0, worst: 0.0 }
    );
}

#[test]
fn degenerate_dataset_is_reported() {
    let mut input = rows("Flat", &[("A", 3.0), ("B", 3.0)]);
    input.extend(rows("Slope", &[("A", 1.0), ("B", 2.0)]));
    let mut collection = load(input, &PolarityRules::empty());

    let outcome = run_pipeline(&mut collection, &RankingOptions::default());

    assert_eq!(
        outcome.diagnostics.count_kind(AnomalyKind::DegenerateNormalization),
        1
    );
    assert_eq!(ranked(&outcome), vec![("B", 1, 0.5), ("A", 2, 0.0)]);
}

#[test]
fn empty_collection_yields_empty_ranking() {
    let mut collection = DatasetCollection::new();
    let outcome = run_pipeline(&mut collection, &RankingOptions::default());

    assert!(outcome.is_empty());
    assert!(outcome.excluded.is_empty());
    assert_eq!(outcome.diagnostics.count_kind(AnomalyKind::EmptyCollection), 1);
}

#[test]
fn disjoint_datasets_exclude_everyone() {
    let mut input = rows("Alpha", &[("X", 1.0)]);
    input.extend(rows("Beta", &[("Y", 1.0)]));
    let mut collection = load(input, &PolarityRules::empty());

    let outcome = run_pipeline(&mut collection, &RankingOptions::default());

    assert!(outcome.is_empty());
    assert_eq!(outcome.excluded, vec!["X".to_string(), "Y".to_string()]);
    assert_eq!(outcome.diagnostics.count_kind(AnomalyKind::EmptyCollection), 1);
}

#[test]
fn single_dataset_ranks_by_normalized_score() {
    let rules = PolarityRules::default();
    let input = rows(
        "Global Peace Index",
        &[("IS", 1.1), ("NZ", 1.3), ("AF", 3.4), ("DK", 1.3)],
    );
    let mut collection = load(input, &rules);

    let outcome = run_pipeline(&mut collection, &RankingOptions::default());

    let order: Vec<(&str, usize)> = outcome
        .ranking
        .iter()
        .map(|entry| (entry.entity_id.as_str(), entry.rank))
        .collect();
    assert_eq!(order, vec![("IS", 1), ("DK", 2), ("NZ", 2), ("AF", 4)]);
    assert_eq!(outcome.ranking[0].score, 1.0);
    assert_eq!(outcome.ranking[3].score, 0.0);
}

proptest! {
    #[test]
    fn ranking_is_sorted_and_competition_ranked(
        scores in prop::collection::vec(0.0f64..1.0, 0..48),
        decimals in 0u32..5,
    ) {
        let pairs: Vec<(String, f64)> = scores
            .iter()
            .enumerate()
            .map(|(idx, score)| (format!("E{idx:02}"), *score))
            .collect();
        let ranking = rank_scores(pairs, decimals);

        prop_assert_eq!(ranking.len(), scores.len());
        for (position, window) in ranking.windows(2).enumerate() {
            let (prev, next) = (&window[0], &window[1]);
            prop_assert!(prev.score >= next.score);
            if prev.score == next.score {
                prop_assert_eq!(prev.rank, next.rank);
                prop_assert!(prev.entity_id < next.entity_id);
            } else {
                prop_assert_eq!(next.rank, position + 2);
            }
        }
        if let Some(first) = ranking.first() {
            prop_assert_eq!(first.rank, 1);
        }
    }

    #[test]
    fn every_ranked_entity_is_in_every_dataset(
        coverage in prop::collection::vec(prop::collection::vec(any::<bool>(), 6), 1..4),
    ) {
        let mut input = Vec::new();
        for (dataset, present) in coverage.iter().enumerate() {
            for (entity, included) in present.iter().enumerate() {
                if *included {
                    input.push(ObservationRow::new(
                        format!("D{dataset}"),
                        2020,
                        format!("E{entity}"),
                        entity as f64,
                    ));
                }
            }
        }
        let mut collection = DatasetCollection::new();
        collection.load(input, &PolarityRules::empty());
        let outcome = run_pipeline(&mut collection, &RankingOptions::default());

        for entry in &outcome.ranking {
            let idx: usize = entry.entity_id[1..].parse().unwrap();
            prop_assert!(coverage.iter().all(|present| present[idx]));
            prop_assert!((0.0..=1.0).contains(&entry.score));
        }
        for entity in &outcome.excluded {
            prop_assert!(outcome.ranking.iter().all(|entry| &entry.entity_id != entity));
        }
    }
}
