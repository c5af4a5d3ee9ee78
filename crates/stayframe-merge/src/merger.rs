//! Progressive left join of one variable into the WideTable.
//!
//! The current WideTable is read in ordered batches and each row is
//! written to `<wide>.tmp` with the variable's value appended (empty when
//! the stay has none). The staged file replaces the WideTable only after
//! the row count has been checked, so an interrupted merge leaves the
//! previous table untouched.

use std::path::{Path, PathBuf};

use stayframe_core::coerce::normalize_id;
use stayframe_core::errors::MergeError;
use stayframe_core::models::{ID_COLUMNS, STAY_KEY};
use stayframe_storage::{CsvBatchReader, SealedArtifact, StagedFile};

use crate::dedup::DedupedVariable;

/// Joins variables into the WideTable at `path`, one at a time.
#[derive(Debug, Clone)]
pub struct ProgressiveMerger {
    path: PathBuf,
    batch_size: usize,
}

impl ProgressiveMerger {
    pub fn new(path: impl Into<PathBuf>, batch_size: usize) -> Self {
        Self {
            path: path.into(),
            batch_size: batch_size.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Write the joined table to the staging file without publishing it.
    pub fn stage(&self, variable: &DedupedVariable) -> Result<StagedMerge, MergeError> {
        let column = variable.name();
        if ID_COLUMNS.contains(&column) {
            return Err(MergeError::ReservedColumn {
                column: column.to_string(),
            });
        }

        let mut reader = CsvBatchReader::open(&self.path, self.batch_size)?;
        if reader.headers().iter().any(|h| h == column) {
            return Err(MergeError::ColumnAlreadyMerged {
                column: column.to_string(),
            });
        }
        let key = reader.column_index(STAY_KEY)?;

        let mut staged = StagedFile::create(&self.path)?;
        let mut header: Vec<String> = reader.headers().iter().map(str::to_string).collect();
        header.push(column.to_string());
        staged.write_header(&header)?;

        let mut batch = Vec::with_capacity(self.batch_size);
        let mut matched = 0u64;
        let mut out: Vec<String> = Vec::with_capacity(header.len());
        while reader.next_batch(&mut batch)? {
            for record in &batch {
                let value = record
                    .get(key)
                    .and_then(normalize_id)
                    .and_then(|stay| variable.get(stay));
                out.clear();
                out.extend(record.iter().map(str::to_string));
                match value {
                    Some(v) => {
                        matched += 1;
                        out.push(format_value(v));
                    }
                    None => out.push(String::new()),
                }
                staged.write_record(&out)?;
            }
            tracing::debug!(
                column,
                batches = reader.batches_read(),
                rows = reader.rows_read(),
                "merge batch written"
            );
        }

        let before = reader.rows_read();
        let after = staged.rows_written();
        if before != after {
            return Err(MergeError::RowCountChanged {
                column: column.to_string(),
                before,
                after,
            });
        }

        Ok(StagedMerge {
            column: column.to_string(),
            matched,
            artifact: staged.seal()?,
        })
    }

    /// Stage and publish in one step.
    pub fn merge(&self, variable: &DedupedVariable) -> Result<u64, MergeError> {
        self.stage(variable)?.publish()
    }
}

/// Same float rendering as VariableTable artifacts (`150.0`, not `150`).
fn format_value(value: f64) -> String {
    format!("{value:?}")
}

/// A joined WideTable sitting in its staging file.
///
/// Dropping it without calling [`StagedMerge::publish`] leaves the
/// published WideTable as it was; the next merge overwrites the staging file.
#[derive(Debug)]
pub struct StagedMerge {
    column: String,
    matched: u64,
    artifact: SealedArtifact,
}

impl StagedMerge {
    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn rows(&self) -> u64 {
        self.artifact.rows()
    }

    /// Rows that received a value.
    pub fn matched(&self) -> u64 {
        self.matched
    }

    pub fn staged_path(&self) -> &Path {
        self.artifact.staged_path()
    }

    /// Replace the WideTable with the staged result. Returns the row count.
    pub fn publish(self) -> Result<u64, MergeError> {
        let rows = self.artifact.publish()?;
        tracing::info!(
            column = %self.column,
            rows,
            matched = self.matched,
            "merged variable"
        );
        Ok(rows)
    }
}
