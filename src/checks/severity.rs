use tracing::debug;

use crate::checks::{QualityReport, Severity};

const HEAVY_MISSING_PERCENT: f64 = 10.0;
const HEAVY_BOUND_VIOLATIONS: usize = 5;

pub fn severity_score(report: &QualityReport) -> u32 {
    let mut score = 0;

    let missing_pct = report.total_missing_percent();
    if missing_pct > HEAVY_MISSING_PERCENT {
        score += 3;
    } else if missing_pct > 0.0 {
        score += 1;
    }

    if report.bound_violations > HEAVY_BOUND_VIOLATIONS {
        score += 3;
    } else if report.bound_violations > 0 {
        score += 1;
    }

    if report.logic_violations > 0 {
        score += 5;
    }

    score
}

pub fn compute_severity(report: &QualityReport) -> Severity {
    let score = severity_score(report);
    let severity = Severity::from_score(score);
    debug!(score, %severity, "severity scored");
    severity
}
