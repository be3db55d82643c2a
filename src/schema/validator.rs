use tracing::{debug, warn};

use crate::dataset::{Dataset, Value};
use crate::schema::Column;

pub fn validate_schema(dataset: &Dataset) -> Vec<String> {
    let mut errors = Vec::new();

    for column in Column::ALL {
        if !dataset.has_column(column.as_str()) {
            errors.push(format!("Missing column: {column}"));
        }
    }

    for column in Column::ALL {
        let domain = column.domain();
        if !domain.is_enumerated() {
            continue;
        }
        let Some(values) = dataset.column_values(column.as_str()) else {
            continue;
        };
        let mut invalid: Vec<&Value> = Vec::new();
        for value in values {
            if !domain.admits(value) && !invalid.contains(&value) {
                invalid.push(value);
            }
        }
        if !invalid.is_empty() {
            errors.push(format!(
                "Invalid values in {column}: {}",
                render_value_list(&invalid)
            ));
        }
    }

    if errors.is_empty() {
        debug!(rows = dataset.len(), "schema validation passed");
    } else {
        warn!(errors = errors.len(), "schema validation failed");
    }
    errors
}

fn render_value_list(values: &[&Value]) -> String {
    let items = values
        .iter()
        .map(|value| match value {
            Value::Missing => "missing".to_string(),
            Value::Text(s) => format!("'{s}'"),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{items}]")
}
