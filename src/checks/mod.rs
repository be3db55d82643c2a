pub mod cleaning;
pub mod quality;
pub mod severity;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::schema::Column;

pub const ATTENDANCE_FLOOR: f64 = 50.0;
pub const ATTENDANCE_CEILING: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub total_rows: usize,
    pub missing_values_percent: BTreeMap<String, f64>,
    pub bound_violations: usize,
    pub logic_violations: usize,
}

impl QualityReport {
    /// Sum, not mean, of the per-column missing percentages.
    pub fn total_missing_percent(&self) -> f64 {
        self.missing_values_percent.values().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub row: usize,
    pub column: Column,
    pub original: f64,
    pub corrected: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditLog(Vec<AuditEntry>);

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: AuditEntry) {
        self.0.push(entry);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AuditEntry> {
        self.0.iter()
    }

    pub fn entries(&self) -> &[AuditEntry] {
        &self.0
    }

    pub fn count_for(&self, column: Column) -> usize {
        self.0.iter().filter(|e| e.column == column).count()
    }
}

impl<'a> IntoIterator for &'a AuditLog {
    type Item = &'a AuditEntry;
    type IntoIter = std::slice::Iter<'a, AuditEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=1 => Self::Low,
            2..=4 => Self::Medium,
            _ => Self::High,
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Low => "Dataset suitable for analysis.",
            Self::Medium => "Proceed with caution.",
            Self::High => "Dataset not suitable for analysis. Partner resubmission recommended.",
        }
    }

    pub fn blocks_analysis(&self) -> bool {
        matches!(self, Self::High)
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        };
        write!(f, "{label}")
    }
}
