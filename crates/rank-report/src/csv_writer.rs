//! CSV leaderboard writer.

use std::fs;
use std::path::Path;

use tracing::debug;

use rank_model::AggregateScore;

use crate::error::{ReportError, Result};

/// Header row of the results CSV.
pub const RESULTS_HEADER: [&str; 3] = ["entity", "rank", "score"];

/// Write the leaderboard as `entity,rank,score` rows.
///
/// Scores are printed with exactly `decimals` fractional digits.
pub fn write_results_csv(path: &Path, ranking: &[AggregateScore], decimals: u32) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }
    let mut writer = csv::Writer::from_path(path).map_err(|e| ReportError::csv(path, e))?;
    writer
        .write_record(RESULTS_HEADER)
        .map_err(|e| ReportError::csv(path, e))?;
    for entry in ranking {
        writer
            .write_record([
                entry.entity_id.clone(),
                entry.rank.to_string(),
                format_score(entry.score, decimals),
            ])
            .map_err(|e| ReportError::csv(path, e))?;
    }
    writer.flush().map_err(|e| ReportError::io(path, e))?;
    debug!(path = %path.display(), entries = ranking.len(), "wrote results CSV");
    Ok(())
}

/// Fixed-precision rendering of a score.
pub fn format_score(score: f64, decimals: u32) -> String {
    format!("{score:.prec$}", prec = decimals as usize)
}
