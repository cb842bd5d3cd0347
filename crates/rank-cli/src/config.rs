//! TOML run configuration.
//!
//! ```toml
//! [ranking]
//! decimals = 3
//!
//! [polarity]
//! lower_is_better = ["Global Peace Index", "Global Terrorism Index"]
//!
//! [output]
//! minify_json = false
//! format = "all"
//! ```
//!
//! Every section and key is optional. Command-line flags override file
//! values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use rank_core::{PolarityRules, RankingOptions};

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV_VAR: &str = "COUNTRY_RANK_CONFIG";

/// Which result files a run writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    #[default]
    All,
}

impl OutputFormat {
    pub fn wants_json(self) -> bool {
        matches!(self, Self::Json | Self::All)
    }

    pub fn wants_csv(self) -> bool {
        matches!(self, Self::Csv | Self::All)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    pub minify_json: bool,
    pub format: OutputFormat,
}

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RankConfig {
    pub ranking: RankingOptions,
    pub polarity: PolarityRules,
    pub output: OutputSettings,
}

impl RankConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config =
            Self::from_toml_str(&text).with_context(|| format!("load config {}", path.display()))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load `explicit`, else the file named by [`CONFIG_ENV_VAR`], else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match config_path(explicit) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        std::env::var_os(CONFIG_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
}
