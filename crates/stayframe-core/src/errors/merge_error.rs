use super::error_code::{self, StayframeErrorCode};
use super::StorageError;

/// Merge-stage failures. The first three are precondition violations:
/// they are reported, never corrected.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("variable `{variable}` has more than one row for stay {stay_id}")]
    DuplicateKey { variable: String, stay_id: String },

    #[error("column `{column}` is already present in the wide table")]
    ColumnAlreadyMerged { column: String },

    #[error("merging `{column}` changed the row count from {before} to {after}")]
    RowCountChanged {
        column: String,
        before: u64,
        after: u64,
    },

    #[error("cohort has no encounters to build the wide table from")]
    EmptyCohort,

    #[error("column name `{column}` is reserved for identifiers")]
    ReservedColumn { column: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StayframeErrorCode for MergeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateKey { .. } => error_code::DUPLICATE_KEY,
            Self::ColumnAlreadyMerged { .. } => error_code::COLUMN_ALREADY_MERGED,
            Self::RowCountChanged { .. } => error_code::ROW_COUNT_CHANGED,
            Self::EmptyCohort => error_code::EMPTY_COHORT,
            Self::ReservedColumn { .. } => error_code::RESERVED_COLUMN,
            Self::Storage(e) => e.error_code(),
        }
    }
}
