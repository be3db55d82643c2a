pub mod derive;
pub mod insights;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::schema::EducationLevel;

pub use derive::derive_all_indicators;
pub use insights::derive_insights;

pub const TRANSITION_DROPOFF: &str = "Transition Drop-off";
pub const GENDER_PARITY_INDEX: &str = "Gender Parity Index";

pub type IndicatorSet = BTreeMap<String, IndicatorTable>;

/// Mean completion per education level for one country. `None` marks an
/// aggregate that cannot be computed from the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionDropoffRow {
    pub country: String,
    pub primary: Option<f64>,
    pub lower_secondary: Option<f64>,
    pub higher_secondary: Option<f64>,
    pub drop_primary_secondary: Option<f64>,
    pub drop_secondary_higher: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderParityRow {
    pub country: String,
    pub education_level: EducationLevel,
    pub female: Option<f64>,
    pub male: Option<f64>,
    pub gpi: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelInsight {
    pub education_level: EducationLevel,
    pub mean_completion: Option<f64>,
    pub rural_gap: Option<f64>,
    pub fragility_gap: Option<f64>,
    pub gpi: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IndicatorTable {
    TransitionDropoff(Vec<TransitionDropoffRow>),
    GenderParity(Vec<GenderParityRow>),
}

impl IndicatorTable {
    pub fn header(&self) -> Vec<&'static str> {
        match self {
            Self::TransitionDropoff(_) => vec![
                "country",
                "Primary",
                "Lower Secondary",
                "Higher Secondary",
                "drop_primary_secondary",
                "drop_secondary_higher",
            ],
            Self::GenderParity(_) => {
                vec!["country", "education_level", "Female", "Male", "GPI"]
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::TransitionDropoff(rows) => rows.len(),
            Self::GenderParity(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self, decimals: usize) -> Vec<Vec<String>> {
        let measure = |v: Option<f64>| format_measure(v, decimals);
        match self {
            Self::TransitionDropoff(rows) => rows
                .iter()
                .map(|r| {
                    vec![
                        r.country.clone(),
                        measure(r.primary),
                        measure(r.lower_secondary),
                        measure(r.higher_secondary),
                        measure(r.drop_primary_secondary),
                        measure(r.drop_secondary_higher),
                    ]
                })
                .collect(),
            Self::GenderParity(rows) => rows
                .iter()
                .map(|r| {
                    vec![
                        r.country.clone(),
                        r.education_level.to_string(),
                        measure(r.female),
                        measure(r.male),
                        measure(r.gpi),
                    ]
                })
                .collect(),
        }
    }
}

pub fn format_measure(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "undefined".to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    pub(crate) fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub(crate) fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

pub(crate) fn difference(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? - b?)
}

/// Female over male; undefined when either side is absent or the male mean is zero.
pub(crate) fn parity_ratio(female: Option<f64>, male: Option<f64>) -> Option<f64> {
    match (female, male) {
        (Some(f), Some(m)) if m != 0.0 => Some(f / m),
        _ => None,
    }
}
