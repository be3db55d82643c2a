use std::io::Write;

use crate::dataset::{Dataset, DatasetError};

pub fn write_dataset<W: Write>(
    writer: W,
    dataset: &Dataset,
    delimiter: u8,
) -> Result<(), DatasetError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    writer.write_record(dataset.columns())?;
    for row in dataset.rows() {
        writer.write_record(row.iter().map(|value| value.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}
