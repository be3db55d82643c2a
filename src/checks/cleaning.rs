use tracing::{debug, info};

use crate::checks::{AuditEntry, AuditLog, ATTENDANCE_CEILING, ATTENDANCE_FLOOR};
use crate::dataset::{Dataset, Value};
use crate::schema::Column;

/// Bounded columns in processing order. The audit log follows this order.
pub const BOUNDS: [(Column, f64, f64); 3] = [
    (Column::OutOfSchoolRate, 0.0, 100.0),
    (Column::AttendanceRate, ATTENDANCE_FLOOR, ATTENDANCE_CEILING),
    (Column::CompletionRate, 0.0, 100.0),
];

pub fn clean_dataset(mut dataset: Dataset) -> (Dataset, AuditLog) {
    let mut audit = AuditLog::new();

    for (column, low, high) in BOUNDS {
        let Some(idx) = dataset.column_index(column.as_str()) else {
            debug!(%column, "bounded column absent, skipping");
            continue;
        };
        for row in 0..dataset.len() {
            let Some(cell) = dataset.cell_mut(row, idx) else {
                continue;
            };
            let Some(original) = cell.as_f64() else {
                continue;
            };
            if !(original < low || original > high) {
                continue;
            }
            let corrected = original.clamp(low, high);
            *cell = Value::Float(corrected);
            audit.push(AuditEntry {
                row,
                column,
                original,
                corrected,
            });
        }
    }

    info!(corrections = audit.len(), "cleaning complete");
    (dataset, audit)
}
