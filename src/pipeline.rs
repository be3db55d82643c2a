use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::checks::cleaning::clean_dataset;
use crate::checks::quality::run_quality_checks;
use crate::checks::severity::severity_score;
use crate::checks::{AuditLog, QualityReport, Severity};
use crate::dataset::Dataset;
use crate::indicators::{derive_all_indicators, IndicatorSet};
use crate::schema::validate_schema;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("schema validation failed with {} error(s)", .0.len())]
    SchemaRejected(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub report: QualityReport,
    pub severity: Severity,
    pub severity_score: u32,
    pub cleaned: Dataset,
    pub audit_log: AuditLog,
    pub indicators: IndicatorSet,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub quality_report: QualityReport,
    pub severity: Severity,
    pub severity_score: u32,
    pub guidance: String,
    pub corrections: usize,
    pub completed_at: DateTime<Utc>,
}

impl PipelineOutcome {
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            quality_report: self.report.clone(),
            severity: self.severity,
            severity_score: self.severity_score,
            guidance: self.severity.guidance().to_string(),
            corrections: self.audit_log.len(),
            completed_at: self.completed_at,
        }
    }
}

/// Validate, audit, clean, score, derive. Schema errors stop the run before
/// anything is measured or corrected.
pub fn run_pipeline(dataset: Dataset) -> Result<PipelineOutcome, PipelineError> {
    let errors = validate_schema(&dataset);
    if !errors.is_empty() {
        return Err(PipelineError::SchemaRejected(errors));
    }

    let report = run_quality_checks(&dataset);
    let (cleaned, audit_log) = clean_dataset(dataset);
    let score = severity_score(&report);
    let severity = Severity::from_score(score);
    if severity.blocks_analysis() {
        warn!(score, %severity, "dataset flagged for resubmission");
    } else {
        info!(score, %severity, "dataset scored");
    }
    let indicators = derive_all_indicators(&cleaned);

    Ok(PipelineOutcome {
        report,
        severity,
        severity_score: score,
        cleaned,
        audit_log,
        indicators,
        completed_at: Utc::now(),
    })
}
