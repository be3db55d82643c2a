pub mod loader;
pub mod writer;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Missing,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed reading delimited input: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("row {row}: column {column} expects a number, found {value:?}")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
    #[error("row {row} has {found} values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("duplicate column in header: {0}")]
    DuplicateColumn(String),
}

/// An ordered, fully materialized table. Every row holds one value per column,
/// aligned with `columns`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct RawDataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = DatasetError;

    fn try_from(raw: RawDataset) -> Result<Self, Self::Error> {
        Self::from_rows(raw.columns, raw.rows)
    }
}

impl Dataset {
    pub fn new<I, S>(columns: I) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for column in columns {
            let column = column.into();
            if names.contains(&column) {
                return Err(DatasetError::DuplicateColumn(column));
            }
            names.push(column);
        }
        Ok(Self {
            columns: names,
            rows: Vec::new(),
        })
    }

    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<Value>>) -> Result<Self, DatasetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dataset = Self::new(columns)?;
        for row in rows {
            dataset.push_row(row)?;
        }
        Ok(dataset)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), DatasetError> {
        if row.len() != self.columns.len() {
            return Err(DatasetError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    pub fn numeric(&self, row: usize, column: &str) -> Option<f64> {
        self.value(row, column)?.as_f64()
    }

    pub fn text(&self, row: usize, column: &str) -> Option<&str> {
        self.value(row, column)?.as_text()
    }

    pub fn column_values<'a>(&'a self, column: &str) -> Option<impl Iterator<Item = &'a Value>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().filter_map(move |values| values.get(idx)))
    }

    pub(crate) fn cell_mut(&mut self, row: usize, idx: usize) -> Option<&mut Value> {
        self.rows.get_mut(row)?.get_mut(idx)
    }

    pub fn set_value(&mut self, row: usize, column: &str, value: Value) -> bool {
        let Some(idx) = self.column_index(column) else {
            return false;
        };
        match self.cell_mut(row, idx) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Dataset, DatasetError, Value};

    #[test]
    fn rejects_rows_with_wrong_width() {
        let mut dataset = Dataset::new(["a", "b"]).expect("dataset");
        let err = dataset
            .push_row(vec![Value::Integer(1)])
            .expect_err("short row accepted");
        assert!(matches!(
            err,
            DatasetError::RowWidth {
                expected: 2,
                found: 1,
                ..
            }
        ));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = Dataset::new(["a", "a"]).expect_err("duplicate accepted");
        assert!(matches!(err, DatasetError::DuplicateColumn(name) if name == "a"));
    }

    #[test]
    fn numeric_view_skips_missing_and_text() {
        let dataset = Dataset::from_rows(
            ["x"],
            vec![
                vec![Value::Float(1.5)],
                vec![Value::Missing],
                vec![Value::text("abc")],
                vec![Value::Integer(7)],
            ],
        )
        .expect("dataset");
        assert_eq!(dataset.numeric(0, "x"), Some(1.5));
        assert_eq!(dataset.numeric(1, "x"), None);
        assert_eq!(dataset.numeric(2, "x"), None);
        assert_eq!(dataset.numeric(3, "x"), Some(7.0));
        assert_eq!(dataset.numeric(0, "y"), None);
    }

    #[test]
    fn nan_floats_count_as_missing() {
        assert!(Value::Float(f64::NAN).is_missing());
        assert!(!Value::Float(0.0).is_missing());
        assert_eq!(Value::Float(f64::NAN).as_f64(), None);
    }

    #[test]
    fn deserializing_checks_row_width() {
        let ragged = r#"{"columns":["attendance_rate","completion_rate"],"rows":[[80.0]]}"#;
        let err = serde_json::from_str::<Dataset>(ragged).expect_err("ragged row accepted");
        assert!(err.to_string().contains("expected 2"));

        let json = r#"{"columns":["attendance_rate"],"rows":[[80.0],[null]]}"#;
        let dataset: Dataset = serde_json::from_str(json).expect("dataset");
        assert_eq!(dataset.numeric(0, "attendance_rate"), Some(80.0));
        assert_eq!(dataset.value(1, "attendance_rate"), Some(&Value::Missing));
    }

    #[test]
    fn set_value_reports_unknown_targets() {
        let mut dataset =
            Dataset::from_rows(["x"], vec![vec![Value::Float(1.0)]]).expect("dataset");
        assert!(dataset.set_value(0, "x", Value::Float(2.0)));
        assert!(!dataset.set_value(1, "x", Value::Float(2.0)));
        assert!(!dataset.set_value(0, "y", Value::Float(2.0)));
        assert_eq!(dataset.numeric(0, "x"), Some(2.0));
    }
}
