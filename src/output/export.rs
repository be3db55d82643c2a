use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::output::csv::{audit_log_to_csv, dataset_to_csv, indicator_to_csv};
use crate::output::json::render_qa_document;
use crate::output::report::render_text_report;
use crate::pipeline::PipelineOutcome;

pub const CLEAN_DATASET_FILE: &str = "clean_dataset.csv";
pub const AUDIT_LOG_FILE: &str = "audit_log.csv";
pub const QA_JSON_FILE: &str = "qa_report.json";
pub const QA_TEXT_FILE: &str = "qa_report.txt";

#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    pub write_indicators: bool,
    pub write_text_report: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            write_indicators: true,
            write_text_report: true,
        }
    }
}

pub fn indicator_file_name(name: &str) -> String {
    format!("{}.csv", name.to_lowercase().replace(' ', "_"))
}

pub fn export_outputs(
    dir: &Path,
    outcome: &PipelineOutcome,
    options: ExportOptions,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed creating output directory: {}", dir.display()))?;

    let mut files: Vec<(String, String)> = vec![
        (CLEAN_DATASET_FILE.to_string(), dataset_to_csv(&outcome.cleaned)?),
        (AUDIT_LOG_FILE.to_string(), audit_log_to_csv(&outcome.audit_log)?),
        (
            QA_JSON_FILE.to_string(),
            render_qa_document(&outcome.report, outcome.severity, outcome.severity_score)?,
        ),
    ];
    if options.write_indicators {
        for (name, table) in &outcome.indicators {
            files.push((indicator_file_name(name), indicator_to_csv(table)?));
        }
    }
    if options.write_text_report {
        files.push((
            QA_TEXT_FILE.to_string(),
            render_text_report(&outcome.report, outcome.severity)?,
        ));
    }

    let mut written = Vec::with_capacity(files.len());
    for (name, contents) in files {
        let path = dir.join(name);
        fs::write(&path, contents)
            .with_context(|| format!("failed writing {}", path.display()))?;
        written.push(path);
    }
    info!(dir = %dir.display(), files = written.len(), "exports written");
    Ok(written)
}
