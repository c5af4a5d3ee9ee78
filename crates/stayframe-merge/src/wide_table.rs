//! The WideTable artifact: `subject_id,hadm_id,stay_id,<var>...`.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use stayframe_core::errors::MergeError;
use stayframe_core::models::ID_COLUMNS;
use stayframe_core::CohortRecord;
use stayframe_storage::{CsvBatchReader, StagedFile};

const COUNT_BATCH: usize = 50_000;

#[derive(Debug, Clone)]
pub struct WideTable {
    path: PathBuf,
}

impl WideTable {
    /// Handle to an existing WideTable.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Publish the base table: one row per distinct `stay_id`, first
    /// occurrence kept, cohort order preserved.
    pub fn initialize(path: &Path, records: &[CohortRecord]) -> Result<Self, MergeError> {
        let mut staged = StagedFile::create(path)?;
        staged.write_header(ID_COLUMNS)?;

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for record in records {
            if !seen.insert(record.stay_id.as_str()) {
                continue;
            }
            staged.write_record([
                record.subject_id.as_str(),
                record.hadm_id.as_str(),
                record.stay_id.as_str(),
            ])?;
        }
        let rows = staged.publish()?;

        tracing::info!(
            path = %path.display(),
            rows,
            duplicates = records.len() as u64 - rows,
            "initialized wide table"
        );
        Ok(Self::at(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn columns(&self) -> Result<Vec<String>, MergeError> {
        let reader = CsvBatchReader::open(&self.path, 1)?;
        Ok(reader.headers().iter().map(str::to_string).collect())
    }

    /// Full scan. Used for reporting, not on the merge path.
    pub fn row_count(&self) -> Result<u64, MergeError> {
        let mut reader = CsvBatchReader::open(&self.path, COUNT_BATCH)?;
        let mut batch = Vec::new();
        while reader.next_batch(&mut batch)? {}
        Ok(reader.rows_read())
    }
}
