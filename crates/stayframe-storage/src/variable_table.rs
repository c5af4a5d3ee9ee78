//! VariableTable artifacts: `stay_id,value,charttime`.

use std::path::Path;

use stayframe_core::coerce::{clean_id, parse_timestamp, parse_value};
use stayframe_core::errors::StorageError;
use stayframe_core::VariableRow;

use crate::staged::StagedFile;

/// Write a VariableTable through a staged publish. Rows keep their order.
pub fn write_variable_table(path: &Path, rows: &[VariableRow]) -> Result<u64, StorageError> {
    let mut staged = StagedFile::create(path)?;
    staged.write_header(VariableRow::HEADER)?;
    for row in rows {
        staged.serialize(row)?;
    }
    staged.publish()
}

/// A VariableTable read back from disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedVariableTable {
    /// Usable rows in storage order, `stay_id` cleaned.
    pub rows: Vec<VariableRow>,
    /// Rows dropped for an empty stay id, a missing value or an
    /// unparseable timestamp.
    pub skipped_rows: usize,
}

/// Read a whole VariableTable into memory, in storage order.
///
/// Stay ids get the same cleaning as cohort ids so artifacts keyed
/// `30001.0` still join. Unusable rows are skipped and counted.
pub fn read_variable_table(path: &Path) -> Result<LoadedVariableTable, StorageError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| StorageError::csv(path, e))?;

    let headers = reader.headers().map_err(|e| StorageError::csv(path, e))?.clone();
    let position = |column: &str| {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| StorageError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            })
    };
    let [stay_col, value_col, time_col] = [
        position(VariableRow::HEADER[0])?,
        position(VariableRow::HEADER[1])?,
        position(VariableRow::HEADER[2])?,
    ];

    let mut table = LoadedVariableTable::default();
    let mut record = csv::StringRecord::new();
    while reader
        .read_record(&mut record)
        .map_err(|e| StorageError::csv(path, e))?
    {
        let stay_id = record.get(stay_col).and_then(clean_id);
        let value = record.get(value_col).and_then(parse_value);
        let charttime = record.get(time_col).and_then(parse_timestamp);
        match (stay_id, value, charttime) {
            (Some(stay_id), Some(value), Some(charttime)) => table.rows.push(VariableRow {
                stay_id,
                value,
                charttime,
            }),
            _ => table.skipped_rows += 1,
        }
    }

    if table.skipped_rows > 0 {
        tracing::warn!(
            path = %path.display(),
            skipped = table.skipped_rows,
            kept = table.rows.len(),
            "skipped unusable variable table rows"
        );
    }
    Ok(table)
}
