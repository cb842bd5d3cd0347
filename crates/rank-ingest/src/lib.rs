//! Indicator data ingestion utilities.
//!
//! This crate reads observation rows for the ranking pipeline. It knows
//! nothing about normalization or ranking; it turns files into
//! [`ObservationRow`]s and reports rows it could not parse.
//!
//! # Features
//!
//! - **Observation tables**: one CSV with `dataset,year,country,score` rows
//! - **Indicator directories**: one `COUNTRY,SCORE` CSV per indicator
//! - **Reference lists**: JSON list of recognized country codes
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use rank_ingest::{load_reference_list, read_observation_table};
//!
//! let reference = load_reference_list(Path::new("countries.json"))?;
//! let ingested = read_observation_table(Path::new("data.csv"))?;
//! let filtered = reference.filter(ingested.rows);
//! ```

mod directory;
mod error;
mod header;
mod reference;
mod table;
mod types;

// === Error Types ===
pub use error::{IngestError, Result};

// === Readers ===
pub use directory::{
    UNCODED_SUFFIX, list_indicator_files, read_indicator_directory, read_indicator_file,
    title_from_path,
};
pub use table::{SCORE_COLUMNS, read_observation_table};

// === Reference List ===
pub use reference::{FilteredRows, ReferenceList, load_reference_list, parse_reference_list};

// === Shared Types ===
pub use types::{IngestResult, ObservationRow, RejectedRow};
