//! Sequential fixed-size batch reads over a headed CSV file.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use stayframe_core::errors::StorageError;

/// Reads a CSV source `batch_size` records at a time.
///
/// At most one batch is held in memory; the caller owns the buffer so
/// it can be reused across calls.
pub struct CsvBatchReader {
    path: PathBuf,
    reader: csv::Reader<File>,
    headers: StringRecord,
    batch_size: usize,
    rows_read: u64,
    batches_read: u64,
}

impl CsvBatchReader {
    pub fn open(path: &Path, batch_size: usize) -> Result<Self, StorageError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_path(path)
            .map_err(|e| StorageError::csv(path, e))?;
        let headers = reader
            .headers()
            .map_err(|e| StorageError::csv(path, e))?
            .clone();

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            headers,
            batch_size: batch_size.max(1),
            rows_read: 0,
            batches_read: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    pub fn batches_read(&self) -> u64 {
        self.batches_read
    }

    /// Position of a named column, or `MissingColumn`.
    pub fn column_index(&self, name: &str) -> Result<usize, StorageError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| StorageError::MissingColumn {
                path: self.path.clone(),
                column: name.to_string(),
            })
    }

    /// Replace `batch` with the next batch of records.
    /// Returns `false` once the source is exhausted.
    pub fn next_batch(&mut self, batch: &mut Vec<StringRecord>) -> Result<bool, StorageError> {
        batch.clear();
        while batch.len() < self.batch_size {
            let mut record = StringRecord::new();
            let more = self
                .reader
                .read_record(&mut record)
                .map_err(|e| StorageError::csv(&self.path, e))?;
            if !more {
                break;
            }
            batch.push(record);
        }

        if batch.is_empty() {
            return Ok(false);
        }
        self.rows_read += batch.len() as u64;
        self.batches_read += 1;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_csv(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("source.csv");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn batches_are_bounded_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "id,v\n1,a\n2,b\n3,c\n4,d\n5,e\n");
        let mut reader = CsvBatchReader::open(&path, 2).unwrap();

        let mut batch = Vec::new();
        let mut sizes = Vec::new();
        let mut ids = Vec::new();
        while reader.next_batch(&mut batch).unwrap() {
            sizes.push(batch.len());
            ids.extend(batch.iter().map(|r| r[0].to_string()));
        }

        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
        assert_eq!(reader.rows_read(), 5);
        assert_eq!(reader.batches_read(), 3);
    }

    #[test]
    fn header_only_file_yields_no_batches() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "id,v\n");
        let mut reader = CsvBatchReader::open(&path, 10).unwrap();
        let mut batch = Vec::new();
        assert!(!reader.next_batch(&mut batch).unwrap());
        assert_eq!(reader.rows_read(), 0);
    }

    #[test]
    fn fields_and_headers_are_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), " id , v \n 7 , x \n");
        let mut reader = CsvBatchReader::open(&path, 10).unwrap();
        assert_eq!(reader.column_index("v").unwrap(), 1);
        let mut batch = Vec::new();
        reader.next_batch(&mut batch).unwrap();
        assert_eq!(&batch[0][0], "7");
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "id,v\n");
        let reader = CsvBatchReader::open(&path, 10).unwrap();
        match reader.column_index("charttime") {
            Err(StorageError::MissingColumn { column, .. }) => assert_eq!(column, "charttime"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = CsvBatchReader::open(&dir.path().join("absent.csv"), 10);
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }
}
