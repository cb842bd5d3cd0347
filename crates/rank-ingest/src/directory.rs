//! Indicator directories: one CSV file per dataset.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{IngestError, Result};
use crate::header::{HeaderIndex, field, line_number, open_reader, period_cell, score_cell};
use crate::types::{IngestResult, ObservationRow};

/// Files with this suffix still hold free-text country names and are skipped.
pub const UNCODED_SUFFIX: &str = "_UNCODED.csv";
pub const COUNTRY_COLUMN: &str = "COUNTRY";
pub const SCORE_COLUMN: &str = "SCORE";
pub const YEAR_COLUMN: &str = "YEAR";

/// List indicator CSV files in a directory, sorted by file name.
pub fn list_indicator_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && is_indicator_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_indicator_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let upper = name.to_uppercase();
    upper.ends_with(".CSV") && !upper.ends_with(&UNCODED_SUFFIX.to_uppercase())
}

/// Dataset title for an indicator file (its file stem).
pub fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

/// Read every indicator file in `dir`.
///
/// Rows without a `YEAR` column are stamped with `default_period`.
pub fn read_indicator_directory(dir: &Path, default_period: i32) -> Result<IngestResult> {
    let files = list_indicator_files(dir)?;
    if files.is_empty() {
        return Err(IngestError::EmptyDirectory {
            path: dir.to_path_buf(),
        });
    }
    let mut result = IngestResult::default();
    for path in &files {
        let title = title_from_path(path);
        result.merge(read_indicator_file(path, &title, default_period)?);
    }
    info!(
        path = %dir.display(),
        file_count = files.len(),
        rows = result.rows.len(),
        "read indicator directory"
    );
    Ok(result)
}

/// Read one `COUNTRY,SCORE[,YEAR]` indicator file as dataset `title`.
pub fn read_indicator_file(path: &Path, title: &str, default_period: i32) -> Result<IngestResult> {
    let mut reader = open_reader(path)?;
    let headers = HeaderIndex::read(&mut reader, path)?;
    let entity_idx = headers.require(&[COUNTRY_COLUMN], path)?;
    let score_idx = headers.require(&[SCORE_COLUMN], path)?;
    let year_idx = headers.position(&[YEAR_COLUMN]);

    let mut result = IngestResult::for_source(path);
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| IngestError::csv(path, e))?;
        let line = line_number(&record, row_idx);

        let period = match year_idx {
            Some(idx) if !field(&record, idx).is_empty() => period_cell(&record, idx),
            _ => Ok(default_period),
        };
        let parsed = period.and_then(|period| {
            score_cell(&record, score_idx).map(|score| (period, score))
        });
        let (period, raw_score) = match parsed {
            Ok(values) => values,
            Err(reason) => {
                result.reject(path, line, reason);
                continue;
            }
        };
        result.rows.push(ObservationRow::new(
            title,
            period,
            field(&record, entity_idx),
            raw_score,
        ));
    }

    debug!(
        path = %path.display(),
        title,
        rows = result.rows.len(),
        rejected = result.rejected.len(),
        "read indicator file"
    );
    Ok(result)
}
