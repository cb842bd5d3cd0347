//! JSON artifacts: results, excluded entities, chart series and the analysis report.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use rank_model::AggregateScore;

use crate::analysis::AnalysisReport;
use crate::chart::ChartSeries;
use crate::error::{ReportError, Result};

/// Layout of emitted JSON documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// Two-space indentation, one field per line.
    #[default]
    Pretty,
    /// Single line without whitespace.
    Minified,
}

impl JsonStyle {
    pub fn from_minify(minify: bool) -> Self {
        if minify { Self::Minified } else { Self::Pretty }
    }
}

/// Write the leaderboard as an array of `{entity_id, rank, score}` objects.
pub fn write_results_json(path: &Path, ranking: &[AggregateScore], style: JsonStyle) -> Result<()> {
    write_json(path, &ranking, style)?;
    debug!(path = %path.display(), entries = ranking.len(), "wrote results JSON");
    Ok(())
}

/// Write the excluded entity ids as a JSON array.
pub fn write_excluded(path: &Path, excluded: &[String]) -> Result<()> {
    write_json(path, &excluded, JsonStyle::Pretty)?;
    debug!(path = %path.display(), entities = excluded.len(), "wrote excluded list");
    Ok(())
}

pub fn write_chart_series(path: &Path, series: &ChartSeries, style: JsonStyle) -> Result<()> {
    write_json(path, series, style)
}

/// Write the combined analysis document.
pub fn write_analysis_json(path: &Path, report: &AnalysisReport, style: JsonStyle) -> Result<()> {
    write_json(path, report, style)?;
    debug!(
        path = %path.display(),
        results = report.results.len(),
        anomalies = report.anomalies.len(),
        "wrote analysis report"
    );
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, style: JsonStyle) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| ReportError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    match style {
        JsonStyle::Pretty => serde_json::to_writer_pretty(&mut writer, value),
        JsonStyle::Minified => serde_json::to_writer(&mut writer, value),
    }
    .map_err(|e| ReportError::json(path, e))?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|e| ReportError::io(path, e))
}
