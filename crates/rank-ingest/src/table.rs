//! Long-form observation tables (`dataset,year,country,score`).

use std::path::Path;

use tracing::debug;

use crate::error::{IngestError, Result};
use crate::header::{HeaderIndex, field, line_number, open_reader, period_cell, score_cell};
use crate::types::{IngestResult, ObservationRow};

pub const DATASET_COLUMN: &str = "dataset";
pub const YEAR_COLUMN: &str = "year";
pub const COUNTRY_COLUMN: &str = "country";
/// Accepted names for the score column, in lookup order.
pub const SCORE_COLUMNS: &[&str] = &["score", "normalized_score"];

/// Read a long-form observation table.
///
/// Every row names its dataset title and year, so one file can carry any
/// number of indicators. Rows with an empty title, a non-integer year or an
/// unparseable score are rejected individually; a missing column fails the
/// whole file.
pub fn read_observation_table(path: &Path) -> Result<IngestResult> {
    let mut reader = open_reader(path)?;
    let headers = HeaderIndex::read(&mut reader, path)?;
    let title_idx = headers.require(&[DATASET_COLUMN], path)?;
    let year_idx = headers.require(&[YEAR_COLUMN], path)?;
    let entity_idx = headers.require(&[COUNTRY_COLUMN], path)?;
    let score_idx = headers.require(SCORE_COLUMNS, path)?;

    let mut result = IngestResult::for_source(path);
    for (row_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| IngestError::csv(path, e))?;
        let line = line_number(&record, row_idx);

        let title = field(&record, title_idx);
        if title.is_empty() {
            result.reject(path, line, "missing dataset title");
            continue;
        }
        let parsed = period_cell(&record, year_idx)
            .and_then(|period| score_cell(&record, score_idx).map(|score| (period, score)));
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
        rows = result.rows.len(),
        rejected = result.rejected.len(),
        "read observation table"
    );
    Ok(result)
}
