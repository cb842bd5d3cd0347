//! Data model for multi-indicator country rankings.
//!
//! A [`Dataset`] holds one indicator's [`Record`]s for one period and owns
//! the direction-aware normalization of their scores. Ranked output is a
//! sequence of [`AggregateScore`]s; data-quality problems are collected as
//! [`Anomaly`] entries in [`Diagnostics`].

pub mod dataset;
pub mod diagnostics;
pub mod error;
pub mod record;
pub mod score;

pub use dataset::{Dataset, DatasetKey, NormalizationOutcome, Polarity};
pub use diagnostics::{Anomaly, AnomalyKind, Diagnostics, Severity};
pub use error::{ModelError, Result};
pub use record::{Record, ScoreState};
pub use score::{AggregateScore, MAX_DECIMALS, round_to};
