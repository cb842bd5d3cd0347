//! CLI argument definitions for country ranking.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use rank_cli::config::OutputFormat;

#[derive(Parser)]
#[command(
    name = "country-rank",
    version,
    about = "Rank countries across multiple indicator datasets",
    long_about = "Rank countries across multiple indicator datasets.\n\n\
                  Datasets are restricted to countries covered by every indicator,\n\
                  min-max normalized so that 1.0 is always best, averaged, and ranked\n\
                  with ties sharing the lower rank."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rank countries and write result files.
    Run(RunArgs),

    /// List the datasets found in the input.
    Datasets(InputArgs),
}

/// Input selection shared by every subcommand.
#[derive(Args)]
pub struct InputArgs {
    /// Long-form CSV with dataset, year, country and score columns.
    #[arg(
        long = "data",
        value_name = "CSV",
        conflicts_with = "data_dir",
        required_unless_present = "data_dir"
    )]
    pub data: Option<PathBuf>,

    /// Directory with one COUNTRY,SCORE CSV per indicator.
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Period for indicator files without a YEAR column (default: current year).
    #[arg(long = "period", value_name = "YEAR")]
    pub period: Option<i32>,

    /// JSON list of recognized country codes; other rows are dropped.
    #[arg(long = "reference", value_name = "JSON")]
    pub reference: Option<PathBuf>,

    /// TOML configuration file (default: $COUNTRY_RANK_CONFIG).
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Treat this dataset title as lower-is-better (repeatable).
    #[arg(long = "lower-is-better", value_name = "TITLE")]
    pub lower_is_better: Vec<String>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output directory for result files.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Result files to write (default: from config, else all).
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormatArg>,

    /// Write JSON on a single line.
    #[arg(long = "minify")]
    pub minify: bool,

    /// Decimal places for reported scores and tie detection.
    #[arg(long = "decimals", value_name = "N")]
    pub decimals: Option<u32>,

    /// Rank and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Exit with code 2 when nothing could be ranked.
    #[arg(long = "fail-on-empty")]
    pub fail_on_empty: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Json,
    Csv,
    All,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Json => Self::Json,
            OutputFormatArg::Csv => Self::Csv,
            OutputFormatArg::All => Self::All,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
