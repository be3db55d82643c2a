use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::dataset::{Dataset, DatasetError, Value};
use crate::schema::{Column, Domain};

pub const DEFAULT_MISSING_TOKENS: [&str; 8] =
    ["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub missing_tokens: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            missing_tokens: DEFAULT_MISSING_TOKENS
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

impl LoadOptions {
    fn is_missing(&self, raw: &str) -> bool {
        let trimmed = raw.trim();
        trimmed.is_empty() || self.missing_tokens.iter().any(|token| token == trimmed)
    }
}

pub fn load_path(path: &Path, options: &LoadOptions) -> Result<Dataset, DatasetError> {
    let file = File::open(path)?;
    let dataset = load_reader(file, options)?;
    debug!(
        path = %path.display(),
        rows = dataset.len(),
        columns = dataset.columns().len(),
        "loaded dataset"
    );
    Ok(dataset)
}

pub fn load_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Dataset, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let domains: Vec<Option<Domain>> = headers
        .iter()
        .map(|name| Column::from_str(name).ok().map(|c| c.domain()))
        .collect();
    let mut dataset = Dataset::new(headers.iter())?;

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let mut values = Vec::with_capacity(record.len());
        for (idx, raw) in record.iter().enumerate() {
            let domain = domains.get(idx).copied().flatten();
            let column = headers.get(idx).unwrap_or_default();
            values.push(parse_cell(raw, domain, options, row, column)?);
        }
        dataset.push_row(values)?;
    }
    Ok(dataset)
}

fn parse_cell(
    raw: &str,
    domain: Option<Domain>,
    options: &LoadOptions,
    row: usize,
    column: &str,
) -> Result<Value, DatasetError> {
    if options.is_missing(raw) {
        return Ok(Value::Missing);
    }
    let value = match domain {
        Some(Domain::Percentage) => match raw.trim().parse::<f64>() {
            Ok(v) if v.is_nan() => Value::Missing,
            Ok(v) => Value::Float(v),
            Err(_) => {
                return Err(DatasetError::InvalidNumber {
                    row,
                    column: column.to_string(),
                    value: raw.to_string(),
                })
            }
        },
        Some(Domain::Integers(_)) => parse_integer(raw)
            .map(Value::Integer)
            .unwrap_or_else(|| Value::text(raw)),
        Some(Domain::Booleans) => parse_bool(raw)
            .map(Value::Bool)
            .unwrap_or_else(|| Value::text(raw)),
        Some(Domain::Categories(_)) | Some(Domain::FreeText) => Value::text(raw),
        None => infer_value(raw),
    };
    Ok(value)
}

fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(v);
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

fn infer_value(raw: &str) -> Value {
    if let Some(v) = parse_bool(raw) {
        return Value::Bool(v);
    }
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Value::Integer(v);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_nan() => Value::Missing,
        Ok(v) => Value::Float(v),
        Err(_) => Value::text(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::{load_reader, LoadOptions};
    use crate::dataset::{DatasetError, Value};

    const SAMPLE: &str = "\
country,development_level,fragility,education_level,gender,rural,wealth_quintile,out_of_school_rate,attendance_rate,completion_rate,notes
Chad,Least,1,Primary,Female,True,2,35.5,,60.1,first
Nepal,Less,0.0,Lower Secondary,Male,false,x,12,88.5,70,3
";

    #[test]
    fn types_cells_by_schema_domain() {
        let dataset = load_reader(SAMPLE.as_bytes(), &LoadOptions::default()).expect("load");
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.value(0, "fragility"), Some(&Value::Integer(1)));
        assert_eq!(dataset.value(1, "fragility"), Some(&Value::Integer(0)));
        assert_eq!(dataset.value(0, "rural"), Some(&Value::Bool(true)));
        assert_eq!(dataset.value(1, "rural"), Some(&Value::Bool(false)));
        assert_eq!(dataset.value(1, "wealth_quintile"), Some(&Value::text("x")));
        assert_eq!(dataset.value(0, "attendance_rate"), Some(&Value::Missing));
        assert_eq!(dataset.value(1, "out_of_school_rate"), Some(&Value::Float(12.0)));
        assert_eq!(dataset.value(0, "gender"), Some(&Value::text("Female")));
    }

    #[test]
    fn infers_columns_outside_the_schema() {
        let dataset = load_reader(SAMPLE.as_bytes(), &LoadOptions::default()).expect("load");
        assert_eq!(dataset.value(0, "notes"), Some(&Value::text("first")));
        assert_eq!(dataset.value(1, "notes"), Some(&Value::Integer(3)));
    }

    #[test]
    fn rejects_text_in_percentage_columns() {
        let input = "attendance_rate\n80\nhigh\n";
        let err = load_reader(input.as_bytes(), &LoadOptions::default()).expect_err("accepted");
        match err {
            DatasetError::InvalidNumber { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "attendance_rate");
                assert_eq!(value, "high");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn honours_delimiter_and_missing_tokens() {
        let input = "gender\tcompletion_rate\nMale\t-\nFemale\t55.5\n";
        let options = LoadOptions {
            delimiter: b'\t',
            missing_tokens: vec!["-".to_string()],
        };
        let dataset = load_reader(input.as_bytes(), &options).expect("load");
        assert_eq!(dataset.value(0, "completion_rate"), Some(&Value::Missing));
        assert_eq!(dataset.numeric(1, "completion_rate"), Some(55.5));
    }

    #[test]
    fn blank_cells_are_missing_under_custom_tokens() {
        let input = "attendance_rate,completion_rate\n,70\n  ,-\n";
        let options = LoadOptions {
            missing_tokens: vec!["-".to_string()],
            ..LoadOptions::default()
        };
        let dataset = load_reader(input.as_bytes(), &options).expect("load");
        assert_eq!(dataset.value(0, "attendance_rate"), Some(&Value::Missing));
        assert_eq!(dataset.value(1, "attendance_rate"), Some(&Value::Missing));
        assert_eq!(dataset.value(1, "completion_rate"), Some(&Value::Missing));
    }
}
