use anyhow::Result;
use serde::Serialize;

use crate::checks::{QualityReport, Severity};

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[derive(Debug, Serialize)]
pub struct QaDocument<'a> {
    #[serde(flatten)]
    pub report: &'a QualityReport,
    pub severity: Severity,
    pub severity_score: u32,
}

pub fn render_qa_document(report: &QualityReport, severity: Severity, score: u32) -> Result<String> {
    render_json(&QaDocument {
        report,
        severity,
        severity_score: score,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::render_qa_document;
    use crate::checks::{QualityReport, Severity};

    #[test]
    fn document_keeps_report_field_names() {
        let report = QualityReport {
            total_rows: 100,
            missing_values_percent: BTreeMap::from([("attendance_rate".to_string(), 5.0)]),
            bound_violations: 2,
            logic_violations: 0,
        };
        let text = render_qa_document(&report, Severity::Medium, 2).expect("json");
        let parsed: serde_json::Value = serde_json::from_str(&text).expect("parse");
        assert_eq!(parsed["total_rows"], 100);
        assert_eq!(parsed["missing_values_percent"]["attendance_rate"], 5.0);
        assert_eq!(parsed["bound_violations"], 2);
        assert_eq!(parsed["logic_violations"], 0);
        assert_eq!(parsed["severity"], "MEDIUM");
    }
}
