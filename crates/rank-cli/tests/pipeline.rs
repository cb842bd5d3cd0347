//! Integration tests for the pipeline module.

use std::fs;
use std::path::Path;

use chrono::{TimeZone, Utc};

use rank_cli::config::OutputFormat;
use rank_cli::pipeline::{
    ANALYSIS_JSON, CHART_JSON, EXCLUDED_JSON, InputSource, OutputConfig, RESULTS_CSV,
    RESULTS_JSON, ingest, load, output, rank,
};
use rank_core::{PolarityRules, RankingOptions};
use rank_model::AnomalyKind;
use rank_report::JsonStyle;

const DATA: &str = "dataset,year,country,score\n\
                    Global Peace Index,2020,AT,1.0\n\
                    Global Peace Index,2020,BE,2.0\n\
                    Global Peace Index,2020,CH,3.0\n\
                    Global Peace Index,2020,XX,1.5\n\
                    Prosperity,2020,AT,10\n\
                    Prosperity,2020,BE,30\n\
                    Prosperity,2020,DE,20\n\
                    Prosperity,2020,FR,oops\n";

const REFERENCE: &str = r#"[
    {"code": "AT", "names": ["Austria"]},
    {"code": "BE", "names": ["Belgium"]},
    {"code": "CH", "names": ["Switzerland"]},
    {"code": "DE", "names": ["Germany"]},
    {"code": "FR", "names": ["France"]}
]"#;

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn output_config(dir: &Path, format: OutputFormat, dry_run: bool) -> OutputConfig<'_> {
    OutputConfig {
        output_dir: dir,
        format,
        style: JsonStyle::Pretty,
        decimals: 3,
        generated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        dry_run,
    }
}

#[test]
fn ingest_filters_against_reference_list() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.csv");
    let reference = dir.path().join("countries.json");
    write(&data, DATA);
    write(&reference, REFERENCE);

    let stage = ingest(&InputSource::Table(data), Some(&reference)).unwrap();

    assert_eq!(stage.rows.len(), 6);
    assert_eq!(stage.rejected.len(), 1);
    assert_eq!(stage.unrecognized.iter().collect::<Vec<_>>(), vec!["XX"]);
    assert_eq!(stage.names.get("CH").map(String::as_str), Some("Switzerland"));
}

#[test]
fn full_run_ranks_common_entities_and_reports_anomalies() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.csv");
    let reference = dir.path().join("countries.json");
    write(&data, DATA);
    write(&reference, REFERENCE);

    let stage = ingest(&InputSource::Table(data), Some(&reference)).unwrap();
    let (mut collection, diagnostics) = load(stage, &PolarityRules::default());
    let outcome = rank(&mut collection, &RankingOptions::default(), diagnostics);

    let ranked: Vec<(&str, usize, f64)> = outcome
        .ranking
        .iter()
        .map(|entry| (entry.entity_id.as_str(), entry.rank, entry.score))
        .collect();
    // Peace: AT 1.0, BE 0.0. Prosperity: AT 0.0, BE 1.0.
    assert_eq!(ranked, vec![("AT", 1, 0.5), ("BE", 1, 0.5)]);
    assert_eq!(outcome.excluded, vec!["CH".to_string(), "DE".to_string()]);

    let diagnostics = &outcome.diagnostics;
    assert_eq!(diagnostics.count_kind(AnomalyKind::RejectedRow), 1);
    assert_eq!(diagnostics.count_kind(AnomalyKind::UnrecognizedEntity), 1);
    assert_eq!(diagnostics.count_kind(AnomalyKind::ExcludedEntity), 2);
    assert!(diagnostics.has_errors());
}

#[test]
fn output_writes_every_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.csv");
    write(&data, DATA);
    let out = dir.path().join("output");

    let stage = ingest(&InputSource::Table(data), None).unwrap();
    let (mut collection, diagnostics) = load(stage, &PolarityRules::default());
    let outcome = rank(&mut collection, &RankingOptions::default(), diagnostics);
    let result = output(&output_config(&out, OutputFormat::All, false), &collection, &outcome)
        .unwrap();

    let names: Vec<String> = result
        .written
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![RESULTS_JSON, RESULTS_CSV, EXCLUDED_JSON, ANALYSIS_JSON, CHART_JSON]
    );
    insta::assert_snapshot!(fs::read_to_string(out.join(RESULTS_CSV)).unwrap(), @r"
    entity,rank,score
    AT,1,0.500
    BE,1,0.500
    ");
}

#[test]
fn csv_format_skips_json_results() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.csv");
    write(&data, DATA);
    let out = dir.path().join("output");

    let stage = ingest(&InputSource::Table(data), None).unwrap();
    let (mut collection, diagnostics) = load(stage, &PolarityRules::default());
    let outcome = rank(&mut collection, &RankingOptions::default(), diagnostics);
    output(&output_config(&out, OutputFormat::Csv, false), &collection, &outcome).unwrap();

    assert!(out.join(RESULTS_CSV).is_file());
    assert!(out.join(EXCLUDED_JSON).is_file());
    assert!(!out.join(RESULTS_JSON).exists());
    assert!(!out.join(ANALYSIS_JSON).exists());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.csv");
    write(&data, DATA);
    let out = dir.path().join("output");

    let stage = ingest(&InputSource::Table(data), None).unwrap();
    let (mut collection, diagnostics) = load(stage, &PolarityRules::default());
    let outcome = rank(&mut collection, &RankingOptions::default(), diagnostics);
    let result =
        output(&output_config(&out, OutputFormat::All, true), &collection, &outcome).unwrap();

    assert!(result.written.is_empty());
    assert!(!out.exists());
}

#[test]
fn indicator_directory_uses_default_period() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("indicators/Global Terrorism Index.csv"),
        "COUNTRY,SCORE\nAT,2.0\nBE,4.0\n",
    );
    write(
        &dir.path().join("indicators/Prosperity.csv"),
        "COUNTRY,SCORE\nAT,50\nBE,40\n",
    );
    let source = InputSource::Directory {
        path: dir.path().join("indicators"),
        default_period: 2023,
    };

    let stage = ingest(&source, None).unwrap();
    let (mut collection, diagnostics) = load(stage, &PolarityRules::default());
    assert!(collection.get_dataset("Global Terrorism Index", 2023).is_some());

    let outcome = rank(&mut collection, &RankingOptions::default(), diagnostics);
    assert_eq!(outcome.ranking[0].entity_id, "AT");
    assert_eq!(outcome.ranking[0].score, 1.0);
    assert_eq!(outcome.ranking[1].rank, 2);
}

#[test]
fn missing_input_is_a_hard_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ingest(&InputSource::Table(dir.path().join("absent.csv")), None).unwrap_err();
    assert!(format!("{err:#}").contains("absent.csv"));
}
