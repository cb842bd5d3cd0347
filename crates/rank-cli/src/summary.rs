use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rank_model::{Anomaly, NormalizationOutcome, Severity};
use rank_report::{DatasetSummary, format_score};

use crate::types::RankResult;

pub fn print_summary(result: &RankResult) {
    if result.dry_run {
        println!("Output: {} (dry run, nothing written)", result.output_dir.display());
    } else {
        println!("Output: {}", result.output_dir.display());
        for path in &result.written {
            println!("  {}", path.display());
        }
    }
    print_dataset_table(&result.datasets);
    print_leaderboard(result);
    if !result.excluded.is_empty() {
        println!();
        println!(
            "Excluded ({}): {}",
            result.excluded.len(),
            result.excluded.join(", ")
        );
    }
    print_anomaly_table(&result.diagnostics.anomalies);
}

fn print_dataset_table(datasets: &[DatasetSummary]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Period"),
        header_cell("Polarity"),
        header_cell("Records"),
        header_cell("Normalization"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (mut row, summary) in dataset_rows(datasets).into_iter().zip(datasets) {
        row.push(normalization_cell(summary.normalization));
        table.add_row(row);
    }
    println!();
    println!("{table}");
}

/// Title, period, polarity and record count cells per dataset.
pub fn dataset_rows(datasets: &[DatasetSummary]) -> Vec<Vec<Cell>> {
    datasets
        .iter()
        .map(|summary| {
            vec![
                Cell::new(&summary.title)
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold),
                Cell::new(summary.period),
                Cell::new(summary.polarity.label()),
                count_cell(summary.records),
            ]
        })
        .collect()
}

fn print_leaderboard(result: &RankResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rank"),
        header_cell("Entity"),
        header_cell("Name"),
        header_cell("Score"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    if result.is_empty() {
        table.add_row(vec![
            dim_cell("-"),
            Cell::new("No entities ranked").fg(Color::Yellow),
            dim_cell("-"),
            dim_cell("-"),
        ]);
    }
    for entry in &result.ranking {
        let name = match result.names.get(&entry.entity_id) {
            Some(name) => Cell::new(name),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            rank_cell(entry.rank),
            Cell::new(&entry.entity_id).add_attribute(Attribute::Bold),
            name,
            Cell::new(format_score(entry.score, result.decimals)),
        ]);
    }
    println!();
    println!("{table}");
}

fn print_anomaly_table(anomalies: &[Anomaly]) {
    if anomalies.is_empty() {
        return;
    }
    let mut ordered: Vec<&Anomaly> = anomalies.iter().collect();
    ordered.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| a.entity_id.cmp(&b.entity_id))
    });
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Code"),
        header_cell("Dataset"),
        header_cell("Entity"),
        header_cell("Message"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for anomaly in ordered {
        table.add_row(vec![
            severity_cell(anomaly.severity),
            Cell::new(anomaly.kind.code()),
            optional_cell(anomaly.dataset.as_ref().map(ToString::to_string)),
            optional_cell(anomaly.entity_id.clone()),
            Cell::new(&anomaly.message),
        ]);
    }
    println!();
    println!("Anomalies:");
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn rank_cell(rank: usize) -> Cell {
    let cell = Cell::new(rank);
    match rank {
        1 => cell.fg(Color::Green).add_attribute(Attribute::Bold),
        2 | 3 => cell.fg(Color::Green),
        _ => cell,
    }
}

fn normalization_cell(outcome: Option<NormalizationOutcome>) -> Cell {
    match outcome {
        Some(NormalizationOutcome::Scaled { best, worst }) => {
            Cell::new(format!("best {best}, worst {worst}"))
        }
        Some(NormalizationOutcome::Degenerate { value }) => {
            Cell::new(format!("all equal ({value})")).fg(Color::Yellow)
        }
        Some(NormalizationOutcome::Empty) => dim_cell("empty"),
        Some(NormalizationOutcome::AlreadyNormalized) | None => dim_cell("-"),
    }
}

fn severity_cell(severity: Severity) -> Cell {
    let cell = Cell::new(severity.label()).fg(severity_color(severity));
    if severity == Severity::Error {
        cell.add_attribute(Attribute::Bold)
    } else {
        cell
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Info => Color::Cyan,
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(value: Option<String>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
