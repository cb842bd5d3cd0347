use std::collections::BTreeMap;
use std::path::PathBuf;

use rank_model::{AggregateScore, Diagnostics};
use rank_report::DatasetSummary;

#[derive(Debug)]
pub struct RankResult {
    pub output_dir: PathBuf,
    pub decimals: u32,
    pub datasets: Vec<DatasetSummary>,
    pub ranking: Vec<AggregateScore>,
    pub excluded: Vec<String>,
    pub diagnostics: Diagnostics,
    /// Reference-list display names, by entity code.
    pub names: BTreeMap<String, String>,
    pub written: Vec<PathBuf>,
    pub dry_run: bool,
}

impl RankResult {
    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }
}
