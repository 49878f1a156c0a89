use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use hecon_cli::pipeline::{AnalyzeOutcome, AnonymizeOutcome};
use hecon_model::{Severity, Tier};

pub fn print_anonymize_summary(outcome: &AnonymizeOutcome) {
    println!("Input: {}", outcome.input.display());
    println!("Anonymized dataset: {}", outcome.dataset_path.display());
    println!("Compliance report: {}", outcome.report_path.display());

    let report = &outcome.report;
    let stats = &report.statistics;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Technique"),
        header_cell("Fields"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows = [
        ("Deleted", stats.fields_deleted, &report.fields.deleted),
        ("Hashed", stats.fields_hashed, &report.fields.hashed),
        ("Generalized", stats.fields_generalized, &report.fields.generalized),
        ("Retained", stats.fields_retained, &report.fields.retained),
    ];
    for (technique, count, columns) in rows {
        table.add_row(vec![
            Cell::new(technique).add_attribute(Attribute::Bold),
            count_cell(count, Color::Green),
            list_cell(columns),
        ]);
    }
    table.add_row(vec![
        Cell::new("Records")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(stats.records_processed).add_attribute(Attribute::Bold),
        dim_cell(format!("{} placeholder(s) issued", stats.placeholders_issued)),
    ]);
    println!("{table}");

    if outcome.parse_warnings.total() > 0 {
        println!(
            "Parse warnings: {} cell(s) coerced to null",
            outcome.parse_warnings.total()
        );
    }
    for skipped in &report.skipped_steps {
        println!("Skipped {} for absent column '{}'", skipped.step, skipped.column);
    }
    if report.warnings.is_empty() {
        println!("Validation: clean");
    } else {
        eprintln!("Compliance warnings:");
        for warning in &report.warnings {
            eprintln!("- {warning}");
        }
    }
}

pub fn print_analyze_summary(outcome: &AnalyzeOutcome) {
    let metrics = &outcome.metrics;
    println!("Input: {}", outcome.input.display());
    println!("Metrics: {}", outcome.metrics_path.display());

    let principal = &metrics.principal;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let rows = [
        (
            "Encounters",
            principal.operational.total_encounters.to_string(),
        ),
        (
            "Total billed",
            format!("{:.2}", principal.financial.total_billed),
        ),
        ("Mean billed", optional(principal.financial.mean_billed)),
        (
            "Gross margin %",
            optional(principal.financial.gross_margin_pct),
        ),
        ("Mean stay (days)", optional(principal.operational.mean_stay_days)),
        (
            "Mortality %",
            optional(principal.operational.mortality_rate_pct),
        ),
        ("Mean age", optional(principal.demographic.mean_age)),
        (
            "Parse warnings",
            metrics.data_quality.parse_warnings.to_string(),
        ),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    println!("{table}");

    if metrics.alerts.is_empty() {
        println!("No alerts.");
        return;
    }
    let mut alerts = Table::new();
    alerts.set_header(vec![
        header_cell("Severity"),
        header_cell("Impact"),
        header_cell("Title"),
        header_cell("Evidence"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut alerts);
    align_column(&mut alerts, 0, CellAlignment::Center);
    align_column(&mut alerts, 3, CellAlignment::Right);
    for alert in &metrics.alerts {
        alerts.add_row(vec![
            severity_cell(alert.severity),
            Cell::new(tier_label(alert.impact)),
            Cell::new(&alert.title),
            Cell::new(format!("{:.2}", alert.evidence)),
            Cell::new(&alert.description),
        ]);
    }
    println!();
    println!("Alerts:");
    println!("{alerts}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::High => Cell::new("HIGH")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Medium => Cell::new("MEDIUM").fg(Color::Yellow),
        Severity::Low => Cell::new("LOW").fg(Color::DarkGrey),
    }
}

fn tier_label(tier: Tier) -> &'static str {
    match tier {
        Tier::High => "high",
        Tier::Medium => "medium",
        Tier::Low => "low",
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn list_cell(columns: &[String]) -> Cell {
    if columns.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(columns.join(", "))
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
