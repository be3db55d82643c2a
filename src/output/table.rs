use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::checks::{AuditLog, QualityReport, Severity};
use crate::indicators::{format_measure, IndicatorTable, LevelInsight};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn severity_cell(severity: Severity) -> Cell {
    let color = match severity {
        Severity::Low => Color::Green,
        Severity::Medium => Color::Yellow,
        Severity::High => Color::Red,
    };
    Cell::new(severity.to_string()).fg(color)
}

pub fn render_validation_table(errors: &[String]) -> String {
    let mut table = new_table();
    table.set_header(vec!["#", "Schema Error"]);
    for (idx, error) in errors.iter().enumerate() {
        table.add_row(vec![(idx + 1).to_string(), error.clone()]);
    }
    table.to_string()
}

pub fn render_quality_table(report: &QualityReport) -> String {
    let mut table = new_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Total rows".to_string(), report.total_rows.to_string()]);
    for (column, pct) in &report.missing_values_percent {
        let cell = if *pct > 0.0 {
            Cell::new(format!("{pct:.2}%")).fg(Color::Yellow)
        } else {
            Cell::new(format!("{pct:.2}%"))
        };
        table.add_row(Row::from(vec![Cell::new(format!("Missing: {column}")), cell]));
    }
    table.add_row(vec![
        "Bound violations (attendance)".to_string(),
        report.bound_violations.to_string(),
    ]);
    let logic = if report.logic_violations > 0 {
        Cell::new(report.logic_violations.to_string()).fg(Color::Red)
    } else {
        Cell::new(report.logic_violations.to_string())
    };
    table.add_row(Row::from(vec![
        Cell::new("Logic violations (completion > attendance)"),
        logic,
    ]));
    table.to_string()
}

pub fn render_audit_table(audit: &AuditLog) -> String {
    let mut table = new_table();
    table.set_header(vec!["Row", "Column", "Original", "Corrected"]);
    for entry in audit {
        table.add_row(vec![
            entry.row.to_string(),
            entry.column.to_string(),
            format!("{:.2}", entry.original),
            format!("{:.2}", entry.corrected),
        ]);
    }
    table.to_string()
}

pub fn render_severity_table(severity: Severity, score: u32) -> String {
    let mut table = new_table();
    table.set_header(vec!["Severity", "Score", "Guidance"]);
    table.add_row(Row::from(vec![
        severity_cell(severity),
        Cell::new(score.to_string()),
        Cell::new(severity.guidance()),
    ]));
    table.to_string()
}

pub fn render_indicator_table(name: &str, indicator: &IndicatorTable) -> String {
    let mut table = new_table();
    table.set_header(indicator.header());
    for record in indicator.records(2) {
        table.add_row(record);
    }
    format!("{name}\n{table}")
}

pub fn render_insights_table(insights: &[LevelInsight]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "Education Level",
        "Mean Completion",
        "Urban - Rural (pp)",
        "Non-fragile - Fragile (pp)",
        "GPI",
    ]);
    for item in insights {
        table.add_row(vec![
            item.education_level.to_string(),
            format_measure(item.mean_completion, 2),
            format_measure(item.rural_gap, 2),
            format_measure(item.fragility_gap, 2),
            format_measure(item.gpi, 3),
        ]);
    }
    table.to_string()
}
