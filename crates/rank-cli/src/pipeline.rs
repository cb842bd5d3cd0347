//! Ranking run with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: Read observation rows and filter them against the reference list
//! 2. **Load**: Group rows into datasets, recording rejected records
//! 3. **Rank**: Synchronize, normalize, aggregate and rank
//! 4. **Output**: Write results, excluded list, analysis and chart series
//!
//! Each stage takes the output of the previous stage and returns typed results.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{info, info_span, warn};

use rank_core::{DatasetCollection, PipelineOutcome, PolarityRules, RankingOptions, run_pipeline};
use rank_ingest::{
    ObservationRow, RejectedRow, load_reference_list, read_indicator_directory,
    read_observation_table,
};
use rank_model::{Anomaly, AnomalyKind, Diagnostics};
use rank_report::{
    AnalysisReport, ChartSeries, JsonStyle, write_analysis_json, write_chart_series,
    write_excluded, write_results_csv, write_results_json,
};

use crate::config::OutputFormat;

pub const RESULTS_JSON: &str = "results.json";
pub const RESULTS_CSV: &str = "results.csv";
pub const EXCLUDED_JSON: &str = "excluded.json";
pub const ANALYSIS_JSON: &str = "analysis.json";
pub const CHART_JSON: &str = "chart.json";

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Where observation rows come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// One long-form `dataset,year,country,score` table.
    Table(PathBuf),
    /// A directory with one `COUNTRY,SCORE` file per indicator.
    Directory { path: PathBuf, default_period: i32 },
}

impl InputSource {
    pub fn path(&self) -> &Path {
        match self {
            Self::Table(path) | Self::Directory { path, .. } => path,
        }
    }
}

/// Result of the ingest stage.
#[derive(Debug, Default)]
pub struct IngestStage {
    /// Rows that passed the reference filter.
    pub rows: Vec<ObservationRow>,
    /// Source rows that failed to parse.
    pub rejected: Vec<RejectedRow>,
    /// Entity codes dropped by the reference filter.
    pub unrecognized: BTreeSet<String>,
    /// Display names from the reference list, by code.
    pub names: BTreeMap<String, String>,
    /// Files that contributed rows.
    pub sources: Vec<PathBuf>,
}

/// Read observation rows and restrict them to recognized entities.
pub fn ingest(source: &InputSource, reference: Option<&Path>) -> Result<IngestStage> {
    let ingest_span = info_span!("ingest", source = %source.path().display());
    let _ingest_guard = ingest_span.enter();
    let ingest_start = Instant::now();

    let ingested = match source {
        InputSource::Table(path) => read_observation_table(path)
            .with_context(|| format!("read observation table {}", path.display()))?,
        InputSource::Directory {
            path,
            default_period,
        } => read_indicator_directory(path, *default_period)
            .with_context(|| format!("read indicator directory {}", path.display()))?,
    };
    for rejected in &ingested.rejected {
        warn!(%rejected, "rejected source row");
    }

    let mut stage = IngestStage {
        rejected: ingested.rejected,
        sources: ingested.sources,
        ..IngestStage::default()
    };
    match reference {
        Some(path) => {
            let list = load_reference_list(path)
                .with_context(|| format!("load reference list {}", path.display()))?;
            let filtered = list.filter(ingested.rows);
            stage.names = list
                .codes()
                .filter_map(|code| {
                    list.display_name(code)
                        .map(|name| (code.to_string(), name.to_string()))
                })
                .collect();
            stage.rows = filtered.rows;
            stage.unrecognized = filtered.unrecognized;
        }
        None => stage.rows = ingested.rows,
    }

    info!(
        rows = stage.rows.len(),
        rejected = stage.rejected.len(),
        unrecognized = stage.unrecognized.len(),
        file_count = stage.sources.len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(stage)
}

// ============================================================================
// Stage 2: Load
// ============================================================================

/// Group ingested rows into datasets.
///
/// Rejected source rows and unrecognized entities are carried into the
/// returned diagnostics ahead of record-level anomalies.
pub fn load(stage: IngestStage, rules: &PolarityRules) -> (DatasetCollection, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    for rejected in &stage.rejected {
        diagnostics.push(Anomaly::new(AnomalyKind::RejectedRow, rejected.to_string()));
    }
    for code in &stage.unrecognized {
        diagnostics.push(
            Anomaly::new(AnomalyKind::UnrecognizedEntity, "not on the reference list")
                .with_entity(code.clone()),
        );
    }
    let mut collection = DatasetCollection::new();
    diagnostics.extend(collection.load(stage.rows, rules));
    info!(
        datasets = collection.len(),
        entities = collection.entity_count(),
        anomalies = diagnostics.len(),
        "load complete"
    );
    (collection, diagnostics)
}

// ============================================================================
// Stage 3: Rank
// ============================================================================

/// Run the core pipeline, folding earlier diagnostics into the outcome.
pub fn rank(
    collection: &mut DatasetCollection,
    options: &RankingOptions,
    diagnostics: Diagnostics,
) -> PipelineOutcome {
    let mut outcome = run_pipeline(collection, options);
    let mut combined = diagnostics;
    combined.extend(std::mem::take(&mut outcome.diagnostics));
    outcome.diagnostics = combined;
    if outcome.ranking.is_empty() {
        warn!("ranking is empty");
    }
    outcome
}

// ============================================================================
// Stage 4: Output
// ============================================================================

/// Output configuration.
pub struct OutputConfig<'a> {
    pub output_dir: &'a Path,
    pub format: OutputFormat,
    pub style: JsonStyle,
    pub decimals: u32,
    pub generated_at: DateTime<Utc>,
    pub dry_run: bool,
}

/// Result of the output stage.
#[derive(Debug, Default)]
pub struct OutputResult {
    /// Files written, in write order.
    pub written: Vec<PathBuf>,
}

/// Write ranking artifacts for the selected format.
pub fn output(
    config: &OutputConfig<'_>,
    collection: &DatasetCollection,
    outcome: &PipelineOutcome,
) -> Result<OutputResult> {
    let output_span = info_span!("output", output_dir = %config.output_dir.display());
    let _output_guard = output_span.enter();
    let output_start = Instant::now();
    let mut result = OutputResult::default();

    if config.dry_run {
        info!(
            duration_ms = output_start.elapsed().as_millis(),
            "output skipped (dry run)"
        );
        return Ok(result);
    }

    std::fs::create_dir_all(config.output_dir)
        .with_context(|| format!("create {}", config.output_dir.display()))?;

    if config.format.wants_json() {
        let path = config.output_dir.join(RESULTS_JSON);
        write_results_json(&path, &outcome.ranking, config.style)?;
        result.written.push(path);
    }
    if config.format.wants_csv() {
        let path = config.output_dir.join(RESULTS_CSV);
        write_results_csv(&path, &outcome.ranking, config.decimals)?;
        result.written.push(path);
    }

    let path = config.output_dir.join(EXCLUDED_JSON);
    write_excluded(&path, &outcome.excluded)?;
    result.written.push(path);

    if config.format == OutputFormat::All {
        let report = AnalysisReport::new(config.generated_at, config.decimals)
            .with_datasets(collection)
            .with_results(outcome.ranking.clone())
            .with_excluded(outcome.excluded.clone())
            .with_diagnostics(&outcome.diagnostics);
        let path = config.output_dir.join(ANALYSIS_JSON);
        write_analysis_json(&path, &report, config.style)?;
        result.written.push(path);

        let path = config.output_dir.join(CHART_JSON);
        write_chart_series(&path, &ChartSeries::from_ranking(&outcome.ranking), config.style)?;
        result.written.push(path);
    }

    info!(
        file_count = result.written.len(),
        duration_ms = output_start.elapsed().as_millis(),
        "output complete"
    );
    Ok(result)
}
