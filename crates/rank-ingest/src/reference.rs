//! Reference list of recognized entity codes.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::types::ObservationRow;

/// A reference list entry: a bare code or a country object with names.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReferenceEntry {
    Code(String),
    Country {
        code: String,
        #[serde(default)]
        names: Vec<String>,
    },
}

/// Set of recognized entity codes, with an optional display name each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceList {
    entries: BTreeMap<String, Option<String>>,
}

/// Rows that passed the reference filter and the codes that did not.
#[derive(Debug, Clone, Default)]
pub struct FilteredRows {
    pub rows: Vec<ObservationRow>,
    pub unrecognized: BTreeSet<String>,
}

impl ReferenceList {
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = codes
            .into_iter()
            .map(|code| (code.as_ref().trim().to_string(), None))
            .filter(|(code, _): &(String, Option<String>)| !code.is_empty())
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// First listed name for a code, if the list carried names.
    pub fn display_name(&self, code: &str) -> Option<&str> {
        self.entries.get(code).and_then(|name| name.as_deref())
    }

    /// Keep rows whose entity is on the list.
    ///
    /// Rows with an empty entity id pass through untouched so record
    /// validation can report them.
    pub fn filter(&self, rows: Vec<ObservationRow>) -> FilteredRows {
        let mut filtered = FilteredRows::default();
        for row in rows {
            let code = row.entity_id.trim();
            if code.is_empty() || self.contains(code) {
                filtered.rows.push(row);
            } else {
                filtered.unrecognized.insert(code.to_string());
            }
        }
        filtered
    }
}

/// Parse a reference list from JSON text.
pub fn parse_reference_list(json: &str) -> serde_json::Result<ReferenceList> {
    let raw: Vec<ReferenceEntry> = serde_json::from_str(json)?;
    let mut entries = BTreeMap::new();
    for entry in raw {
        let (code, name) = match entry {
            ReferenceEntry::Code(code) => (code, None),
            ReferenceEntry::Country { code, names } => (code, names.into_iter().next()),
        };
        let code = code.trim().to_string();
        if code.is_empty() {
            continue;
        }
        entries.entry(code).or_insert(name);
    }
    Ok(ReferenceList { entries })
}

/// Load a reference list from a JSON file.
pub fn load_reference_list(path: &Path) -> Result<ReferenceList> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::file_read(path, e))?;
    let list = parse_reference_list(&text).map_err(|e| IngestError::ReferenceParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), codes = list.len(), "loaded reference list");
    Ok(list)
}
