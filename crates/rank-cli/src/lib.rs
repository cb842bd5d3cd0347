//! CLI library components for country ranking.

pub mod config;
pub mod logging;
pub mod pipeline;
