use tracing::info;

use crate::checks::{QualityReport, ATTENDANCE_CEILING, ATTENDANCE_FLOOR};
use crate::dataset::Dataset;
use crate::schema::Column;

/// Measures the raw table. Only attendance is audited for bound violations.
pub fn run_quality_checks(dataset: &Dataset) -> QualityReport {
    let total_rows = dataset.len();

    let missing_values_percent = dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let missing = dataset
                .rows()
                .iter()
                .filter(|row| row[idx].is_missing())
                .count();
            (name.clone(), missing_percent(missing, total_rows))
        })
        .collect();

    let attendance = Column::AttendanceRate.as_str();
    let completion = Column::CompletionRate.as_str();

    let bound_violations = (0..total_rows)
        .filter_map(|row| dataset.numeric(row, attendance))
        .filter(|v| *v > ATTENDANCE_CEILING || *v < ATTENDANCE_FLOOR)
        .count();

    let logic_violations = (0..total_rows)
        .filter(|&row| {
            matches!(
                (dataset.numeric(row, completion), dataset.numeric(row, attendance)),
                (Some(c), Some(a)) if c > a
            )
        })
        .count();

    info!(
        total_rows,
        bound_violations, logic_violations, "quality checks complete"
    );

    QualityReport {
        total_rows,
        missing_values_percent,
        bound_violations,
        logic_violations,
    }
}

fn missing_percent(missing: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to_hundredths(missing as f64 / total as f64 * 100.0)
}

pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::{round_to_hundredths, run_quality_checks};
    use crate::dataset::{Dataset, Value};

    fn rates(rows: &[(Option<f64>, Option<f64>, Option<f64>)]) -> Dataset {
        let to_value = |v: Option<f64>| v.map(Value::Float).unwrap_or(Value::Missing);
        Dataset::from_rows(
            ["out_of_school_rate", "attendance_rate", "completion_rate"],
            rows.iter()
                .map(|(osr, ar, cr)| vec![to_value(*osr), to_value(*ar), to_value(*cr)])
                .collect(),
        )
        .expect("dataset")
    }

    #[test]
    fn counts_attendance_outside_sector_bounds_only() {
        let data = rates(&[
            (Some(150.0), Some(80.0), Some(70.0)),
            (Some(10.0), Some(120.0), Some(70.0)),
            (Some(10.0), Some(40.0), Some(30.0)),
            (Some(10.0), Some(50.0), Some(-5.0)),
            (Some(10.0), Some(100.0), Some(90.0)),
        ]);
        let report = run_quality_checks(&data);
        assert_eq!(report.total_rows, 5);
        assert_eq!(report.bound_violations, 2);
        assert_eq!(report.logic_violations, 0);
    }

    #[test]
    fn completion_above_attendance_is_a_logic_violation() {
        let data = rates(&[
            (Some(5.0), Some(80.0), Some(90.0)),
            (Some(5.0), Some(80.0), Some(80.0)),
            (Some(5.0), None, Some(90.0)),
            (Some(5.0), Some(60.0), None),
        ]);
        let report = run_quality_checks(&data);
        assert_eq!(report.logic_violations, 1);
        assert_eq!(report.bound_violations, 0);
    }

    #[test]
    fn missing_percentages_cover_every_column() {
        let data = rates(&[
            (None, Some(80.0), Some(70.0)),
            (Some(5.0), None, Some(70.0)),
            (Some(5.0), Some(80.0), Some(70.0)),
        ]);
        let report = run_quality_checks(&data);
        assert_eq!(report.missing_values_percent.len(), 3);
        assert_eq!(report.missing_values_percent["out_of_school_rate"], 33.33);
        assert_eq!(report.missing_values_percent["attendance_rate"], 33.33);
        assert_eq!(report.missing_values_percent["completion_rate"], 0.0);
        assert!((report.total_missing_percent() - 66.66).abs() < 1e-9);
    }

    #[test]
    fn nan_cells_are_counted_as_missing() {
        let data = rates(&[
            (Some(5.0), Some(f64::NAN), Some(70.0)),
            (Some(5.0), Some(f64::NAN), Some(70.0)),
        ]);
        let report = run_quality_checks(&data);
        assert_eq!(report.missing_values_percent["attendance_rate"], 100.0);
        assert_eq!(report.logic_violations, 0);
        assert_eq!(report.bound_violations, 0);
    }

    #[test]
    fn empty_dataset_reports_zero_missing() {
        let data = rates(&[]);
        let report = run_quality_checks(&data);
        assert_eq!(report.total_rows, 0);
        assert!(report.missing_values_percent.values().all(|v| *v == 0.0));
    }

    #[test]
    fn repeated_audits_are_identical() {
        let data = rates(&[
            (Some(5.0), Some(130.0), Some(90.0)),
            (None, Some(45.0), Some(50.0)),
        ]);
        assert_eq!(run_quality_checks(&data), run_quality_checks(&data));
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round_to_hundredths(12.345678), 12.35);
        assert_eq!(round_to_hundredths(5.0), 5.0);
    }
}
