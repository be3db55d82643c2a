pub mod validator;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::Value;

pub use validator::validate_schema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Country,
    DevelopmentLevel,
    Fragility,
    EducationLevel,
    Gender,
    Rural,
    WealthQuintile,
    OutOfSchoolRate,
    AttendanceRate,
    CompletionRate,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Country,
        Column::DevelopmentLevel,
        Column::Fragility,
        Column::EducationLevel,
        Column::Gender,
        Column::Rural,
        Column::WealthQuintile,
        Column::OutOfSchoolRate,
        Column::AttendanceRate,
        Column::CompletionRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::DevelopmentLevel => "development_level",
            Self::Fragility => "fragility",
            Self::EducationLevel => "education_level",
            Self::Gender => "gender",
            Self::Rural => "rural",
            Self::WealthQuintile => "wealth_quintile",
            Self::OutOfSchoolRate => "out_of_school_rate",
            Self::AttendanceRate => "attendance_rate",
            Self::CompletionRate => "completion_rate",
        }
    }

    pub fn domain(&self) -> Domain {
        match self {
            Self::Country => Domain::FreeText,
            Self::DevelopmentLevel => Domain::Categories(&DevelopmentLevel::LABELS),
            Self::Fragility => Domain::Integers(&[0, 1]),
            Self::EducationLevel => Domain::Categories(&EducationLevel::LABELS),
            Self::Gender => Domain::Categories(&Gender::LABELS),
            Self::Rural => Domain::Booleans,
            Self::WealthQuintile => Domain::Integers(&[1, 2, 3, 4, 5]),
            Self::OutOfSchoolRate | Self::AttendanceRate | Self::CompletionRate => {
                Domain::Percentage
            }
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown column: {0}")]
pub struct ColumnParseError(pub String);

impl FromStr for Column {
    type Err = ColumnParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|column| column.as_str() == s)
            .ok_or_else(|| ColumnParseError(s.to_string()))
    }
}

/// What a column may hold. Only enumerated domains are checked for
/// membership; percentages are range-checked by the cleaner instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    FreeText,
    Categories(&'static [&'static str]),
    Integers(&'static [i64]),
    Booleans,
    Percentage,
}

impl Domain {
    pub fn is_enumerated(&self) -> bool {
        matches!(
            self,
            Self::Categories(_) | Self::Integers(_) | Self::Booleans
        )
    }

    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::FreeText | Self::Percentage, _) => true,
            (Self::Categories(allowed), Value::Text(s)) => allowed.contains(&s.as_str()),
            (Self::Integers(allowed), Value::Integer(v)) => allowed.contains(v),
            (Self::Booleans, Value::Bool(_)) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown {kind}: {value}")]
pub struct CategoryParseError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DevelopmentLevel {
    Least,
    Less,
    More,
}

impl DevelopmentLevel {
    pub const ALL: [DevelopmentLevel; 3] = [Self::Least, Self::Less, Self::More];
    pub const LABELS: [&'static str; 3] = ["Least", "Less", "More"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Least => "Least",
            Self::Less => "Less",
            Self::More => "More",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EducationLevel {
    Primary,
    #[serde(rename = "Lower Secondary")]
    LowerSecondary,
    #[serde(rename = "Higher Secondary")]
    HigherSecondary,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 3] =
        [Self::Primary, Self::LowerSecondary, Self::HigherSecondary];
    pub const LABELS: [&'static str; 3] = ["Primary", "Lower Secondary", "Higher Secondary"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "Primary",
            Self::LowerSecondary => "Lower Secondary",
            Self::HigherSecondary => "Higher Secondary",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Self::Male, Self::Female];
    pub const LABELS: [&'static str; 2] = ["Male", "Female"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl Display for DevelopmentLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for EducationLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DevelopmentLevel {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| CategoryParseError {
                kind: "development level",
                value: s.to_string(),
            })
    }
}

impl FromStr for EducationLevel {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| CategoryParseError {
                kind: "education level",
                value: s.to_string(),
            })
    }
}

impl FromStr for Gender {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|gender| gender.as_str() == s)
            .ok_or_else(|| CategoryParseError {
                kind: "gender",
                value: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Column, DevelopmentLevel, Domain, EducationLevel, Gender};
    use crate::dataset::Value;

    #[test]
    fn labels_follow_display_names() {
        for (level, label) in DevelopmentLevel::ALL.iter().zip(DevelopmentLevel::LABELS) {
            assert_eq!(level.as_str(), label);
        }
        for (level, label) in EducationLevel::ALL.iter().zip(EducationLevel::LABELS) {
            assert_eq!(level.as_str(), label);
        }
        for (gender, label) in Gender::ALL.iter().zip(Gender::LABELS) {
            assert_eq!(gender.as_str(), label);
        }
    }

    #[test]
    fn column_names_parse_exactly() {
        for column in Column::ALL {
            assert_eq!(Column::from_str(column.as_str()).ok(), Some(column));
        }
        assert!(Column::from_str("Gender").is_err());
        assert!(Column::from_str(" gender").is_err());
    }

    #[test]
    fn membership_requires_matching_type() {
        let fragility = Column::Fragility.domain();
        assert!(fragility.admits(&Value::Integer(1)));
        assert!(!fragility.admits(&Value::Integer(2)));
        assert!(!fragility.admits(&Value::Float(1.0)));
        assert!(!fragility.admits(&Value::text("1")));

        let rural = Column::Rural.domain();
        assert!(rural.admits(&Value::Bool(false)));
        assert!(!rural.admits(&Value::Integer(0)));

        let gender = Column::Gender.domain();
        assert!(gender.admits(&Value::text("Female")));
        assert!(!gender.admits(&Value::text("female")));
        assert!(!gender.admits(&Value::Missing));
    }

    #[test]
    fn percentages_are_not_enumerated() {
        assert_eq!(Column::AttendanceRate.domain(), Domain::Percentage);
        assert!(!Domain::Percentage.is_enumerated());
        assert!(!Domain::FreeText.is_enumerated());
        assert!(Column::WealthQuintile.domain().is_enumerated());
    }

    #[test]
    fn category_parsing_is_case_sensitive() {
        assert_eq!(
            EducationLevel::from_str("Lower Secondary").ok(),
            Some(EducationLevel::LowerSecondary)
        );
        assert!(EducationLevel::from_str("lower secondary").is_err());
        assert!(Gender::from_str("M").is_err());
    }
}
