use anyhow::{Result, bail};
use chrono::{Datelike, Utc};
use comfy_table::Table;
use tracing::{debug, info_span};

use rank_cli::config::RankConfig;
use rank_cli::pipeline::{InputSource, OutputConfig, ingest, load, output, rank};
use rank_core::{PolarityRules, RankingOptions};
use rank_report::{DatasetSummary, JsonStyle};

use crate::cli::{InputArgs, RunArgs};
use crate::summary::{apply_table_style, dataset_rows};
use crate::types::RankResult;

pub fn run_datasets(args: &InputArgs) -> Result<()> {
    let config = RankConfig::resolve(args.config.as_deref())?;
    let rules = polarity_rules(&config, args);
    let stage = ingest(&input_source(args)?, args.reference.as_deref())?;
    let (collection, _) = load(stage, &rules);

    let summaries: Vec<DatasetSummary> = collection.iter().map(DatasetSummary::from).collect();
    let mut table = Table::new();
    table.set_header(vec!["Dataset", "Period", "Polarity", "Records"]);
    apply_table_style(&mut table);
    for row in dataset_rows(&summaries) {
        table.add_row(row);
    }
    println!("{table}");
    Ok(())
}

pub fn run_rank(args: &RunArgs) -> Result<RankResult> {
    let run_span = info_span!("run", output_dir = %args.output_dir.display());
    let _run_guard = run_span.enter();

    let config = RankConfig::resolve(args.input.config.as_deref())?;
    let rules = polarity_rules(&config, &args.input);
    let options = args
        .decimals
        .map_or(config.ranking, RankingOptions::new);
    let format = args.format.map_or(config.output.format, Into::into);
    let style = JsonStyle::from_minify(args.minify || config.output.minify_json);
    debug!(decimals = options.decimals(), ?format, ?style, "resolved run options");

    let stage = ingest(&input_source(&args.input)?, args.input.reference.as_deref())?;
    let names = stage.names.clone();
    let (mut collection, diagnostics) = load(stage, &rules);
    let outcome = rank(&mut collection, &options, diagnostics);

    let output_config = OutputConfig {
        output_dir: &args.output_dir,
        format,
        style,
        decimals: options.decimals(),
        generated_at: Utc::now(),
        dry_run: args.dry_run,
    };
    let written = output(&output_config, &collection, &outcome)?.written;

    Ok(RankResult {
        output_dir: args.output_dir.clone(),
        decimals: options.decimals(),
        datasets: collection.iter().map(DatasetSummary::from).collect(),
        ranking: outcome.ranking,
        excluded: outcome.excluded,
        diagnostics: outcome.diagnostics,
        names,
        written,
        dry_run: args.dry_run,
    })
}

/// Configured rules plus any `--lower-is-better` titles.
fn polarity_rules(config: &RankConfig, args: &InputArgs) -> PolarityRules {
    let mut rules = config.polarity.clone();
    for title in &args.lower_is_better {
        rules.add_lower_is_better(title.as_str());
    }
    rules
}

fn input_source(args: &InputArgs) -> Result<InputSource> {
    match (&args.data, &args.data_dir) {
        (Some(path), _) => Ok(InputSource::Table(path.clone())),
        (None, Some(path)) => Ok(InputSource::Directory {
            path: path.clone(),
            default_period: args.period.unwrap_or_else(|| Utc::now().year()),
        }),
        (None, None) => bail!("either --data or --data-dir is required"),
    }
}
