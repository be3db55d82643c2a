use anyhow::Result;

use crate::checks::{AuditLog, QualityReport};
use crate::dataset::writer::write_dataset;
use crate::dataset::Dataset;
use crate::indicators::IndicatorTable;

pub fn dataset_to_csv(dataset: &Dataset) -> Result<String> {
    let mut buf = Vec::new();
    write_dataset(&mut buf, dataset, b',')?;
    Ok(String::from_utf8_lossy(&buf).to_string())
}

pub fn audit_log_to_csv(audit: &AuditLog) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["row", "column", "original", "corrected"])?;
    for entry in audit {
        writer.write_record([
            entry.row.to_string(),
            entry.column.to_string(),
            entry.original.to_string(),
            entry.corrected.to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn indicator_to_csv(table: &IndicatorTable) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(table.header())?;
    for record in table.records(4) {
        writer.write_record(&record)?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn quality_report_to_csv(report: &QualityReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["metric", "value"])?;
    writer.write_record(["total_rows".to_string(), report.total_rows.to_string()])?;
    for (column, pct) in &report.missing_values_percent {
        writer.write_record([format!("missing_values_percent.{column}"), format!("{pct:.2}")])?;
    }
    writer.write_record([
        "bound_violations".to_string(),
        report.bound_violations.to_string(),
    ])?;
    writer.write_record([
        "logic_violations".to_string(),
        report.logic_violations.to_string(),
    ])?;
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn errors_to_csv(errors: &[String]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["error"])?;
    for error in errors {
        writer.write_record([error])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

#[cfg(test)]
mod tests {
    use super::{audit_log_to_csv, indicator_to_csv};
    use crate::checks::cleaning::clean_dataset;
    use crate::dataset::{Dataset, Value};
    use crate::indicators::{IndicatorTable, TransitionDropoffRow};

    #[test]
    fn audit_csv_has_fixed_column_order() {
        let data = Dataset::from_rows(
            ["attendance_rate", "completion_rate"],
            vec![
                vec![Value::Float(80.0), Value::Float(70.0)],
                vec![Value::Float(120.0), Value::Float(-2.5)],
            ],
        )
        .expect("dataset");
        let (_, audit) = clean_dataset(data);
        let text = audit_log_to_csv(&audit).expect("csv");
        assert_eq!(
            text,
            "row,column,original,corrected\n1,attendance_rate,120,100\n1,completion_rate,-2.5,0\n"
        );
    }

    #[test]
    fn indicator_csv_marks_undefined_cells() {
        let table = IndicatorTable::TransitionDropoff(vec![TransitionDropoffRow {
            country: "Chad".to_string(),
            primary: Some(60.0),
            lower_secondary: None,
            higher_secondary: None,
            drop_primary_secondary: None,
            drop_secondary_higher: None,
        }]);
        let text = indicator_to_csv(&table).expect("csv");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("country,Primary,Lower Secondary,Higher Secondary,drop_primary_secondary,drop_secondary_higher")
        );
        assert_eq!(
            lines.next(),
            Some("Chad,60.0000,undefined,undefined,undefined,undefined")
        );
    }
}
