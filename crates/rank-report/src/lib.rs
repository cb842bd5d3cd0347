//! Ranking output generation.
//!
//! Emitters for a finished leaderboard:
//!
//! - **results.json**: array of `{entity_id, rank, score}` objects
//! - **results.csv**: `entity,rank,score` with fixed-precision scores
//! - **excluded.json**: entities dropped for partial coverage
//! - **analysis.json**: results plus run metadata and anomalies
//! - **chart.json**: reverse-sorted series for a horizontal bar chart

mod analysis;
mod chart;
mod csv_writer;
mod error;
mod json;

pub use analysis::{AnalysisReport, DatasetSummary};
pub use chart::ChartSeries;
pub use csv_writer::{RESULTS_HEADER, format_score, write_results_csv};
pub use error::{ReportError, Result};
pub use json::{
    JsonStyle, write_analysis_json, write_chart_series, write_excluded, write_results_json,
};
