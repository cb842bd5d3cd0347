//! Reconciliation, normalization and ranking of indicator datasets.
//!
//! [`DatasetCollection`] owns every dataset of a run and restricts them to a
//! common entity set; [`Aggregator`] averages the normalized scores and
//! produces a tie-aware leaderboard. [`run_pipeline`] chains the stages.

pub mod aggregate;
pub mod collection;
pub mod options;
pub mod pipeline;
pub mod polarity;

pub use aggregate::{Aggregator, rank_scores};
pub use collection::{DatasetCollection, SyncReport};
pub use options::{DEFAULT_DECIMALS, MAX_DECIMALS, RankingOptions};
pub use pipeline::{PipelineOutcome, run_pipeline};
pub use polarity::{DEFAULT_LOWER_IS_BETTER, PolarityRules};
