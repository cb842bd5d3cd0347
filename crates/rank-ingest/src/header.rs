//! Header lookup and cell parsing shared by the CSV readers.

use std::fs::File;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};

use crate::error::{IngestError, Result};

/// Open a CSV file with a header row, trimming every field.
///
/// Rows may have fewer fields than the header; missing cells read as empty.
pub(crate) fn open_reader(path: &Path) -> Result<Reader<File>> {
    let file = File::open(path).map_err(|e| IngestError::file_read(path, e))?;
    Ok(ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file))
}

/// Case-insensitive column positions of a header row.
#[derive(Debug, Clone)]
pub(crate) struct HeaderIndex {
    columns: Vec<String>,
}

impl HeaderIndex {
    pub(crate) fn read(reader: &mut Reader<File>, path: &Path) -> Result<Self> {
        let headers = reader.headers().map_err(|e| IngestError::csv(path, e))?;
        Ok(Self::from_record(headers))
    }

    pub(crate) fn from_record(headers: &StringRecord) -> Self {
        let columns = headers
            .iter()
            .map(|name| name.trim_matches('\u{feff}').trim().to_lowercase())
            .collect();
        Self { columns }
    }

    /// Position of the first column matching any of `names`.
    pub(crate) fn position(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| {
            self.columns
                .iter()
                .position(|column| column.eq_ignore_ascii_case(name))
        })
    }

    pub(crate) fn require(&self, names: &[&str], path: &Path) -> Result<usize> {
        self.position(names)
            .ok_or_else(|| IngestError::MissingColumn {
                column: names.first().copied().unwrap_or_default().to_string(),
                path: path.to_path_buf(),
            })
    }
}

/// Trimmed cell value, empty when the row is short.
pub(crate) fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("").trim()
}

/// Year cell as a period, or the reason the row is rejected.
pub(crate) fn period_cell(record: &StringRecord, idx: usize) -> std::result::Result<i32, String> {
    let raw = field(record, idx);
    raw.parse().map_err(|_| format!("invalid year '{raw}'"))
}

/// Score cell as a number, or the reason the row is rejected.
///
/// Digit grouping (`1,234.5`, `1 234`) is ignored. Non-finite spellings
/// parse here and are rejected by record validation.
pub(crate) fn score_cell(record: &StringRecord, idx: usize) -> std::result::Result<f64, String> {
    let raw = field(record, idx);
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '\u{a0}'))
        .collect();
    digits.parse().map_err(|_| format!("invalid score '{raw}'"))
}

/// 1-based source line of a record, falling back to its row index.
pub(crate) fn line_number(record: &StringRecord, row_idx: usize) -> u64 {
    record
        .position()
        .map_or(row_idx as u64 + 2, csv::Position::line)
}
