use std::fmt;
use std::path::{Path, PathBuf};

/// One `(dataset, period, entity, score)` observation read from a source file.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRow {
    pub title: String,
    pub period: i32,
    pub entity_id: String,
    pub raw_score: f64,
}

impl ObservationRow {
    pub fn new(title: impl Into<String>, period: i32, entity_id: impl Into<String>, raw_score: f64) -> Self {
        Self {
            title: title.into(),
            period,
            entity_id: entity_id.into(),
            raw_score,
        }
    }
}

/// A source row that could not be turned into an observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub path: PathBuf,
    /// 1-based line number in the source file (header is line 1).
    pub line: u64,
    pub reason: String,
}

impl fmt::Display for RejectedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.path.display(), self.line, self.reason)
    }
}

/// Rows read from one or more source files.
#[derive(Debug, Clone, Default)]
pub struct IngestResult {
    /// Parsed observations in file order.
    pub rows: Vec<ObservationRow>,
    /// Rows skipped because a field did not parse.
    pub rejected: Vec<RejectedRow>,
    /// Files that contributed rows.
    pub sources: Vec<PathBuf>,
}

impl IngestResult {
    pub(crate) fn for_source(path: &Path) -> Self {
        Self {
            sources: vec![path.to_path_buf()],
            ..Self::default()
        }
    }

    pub(crate) fn reject(&mut self, path: &Path, line: u64, reason: impl Into<String>) {
        self.rejected.push(RejectedRow {
            path: path.to_path_buf(),
            line,
            reason: reason.into(),
        });
    }

    pub fn merge(&mut self, other: IngestResult) {
        self.rows.extend(other.rows);
        self.rejected.extend(other.rejected);
        self.sources.extend(other.sources);
    }
}
