use std::fmt::{self, Write};

use crate::checks::{QualityReport, Severity};

pub fn render_text_report(
    report: &QualityReport,
    severity: Severity,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Data Quality Assurance Report")?;
    writeln!(out, "=============================")?;
    writeln!(out, "Total rows: {}", report.total_rows)?;
    writeln!(out, "Severity level: {severity}")?;
    writeln!(out)?;
    writeln!(out, "Missing Values (%)")?;
    for (column, pct) in &report.missing_values_percent {
        writeln!(out, "{column}: {pct}%")?;
    }
    writeln!(out)?;
    writeln!(out, "Bound violations: {}", report.bound_violations)?;
    writeln!(out, "Logic violations: {}", report.logic_violations)?;
    writeln!(out)?;
    writeln!(out, "{}", severity.guidance())?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::render_text_report;
    use crate::checks::{QualityReport, Severity};

    #[test]
    fn lists_every_section() {
        let report = QualityReport {
            total_rows: 114,
            missing_values_percent: BTreeMap::from([
                ("attendance_rate".to_string(), 5.26),
                ("country".to_string(), 0.0),
            ]),
            bound_violations: 0,
            logic_violations: 2,
        };
        let text = render_text_report(&report, Severity::High).expect("report");
        assert!(text.contains("Total rows: 114"));
        assert!(text.contains("Severity level: HIGH"));
        assert!(text.contains("attendance_rate: 5.26%"));
        assert!(text.contains("country: 0%"));
        assert!(text.contains("Logic violations: 2"));
        assert!(text.ends_with("Partner resubmission recommended.\n"));
    }
}
