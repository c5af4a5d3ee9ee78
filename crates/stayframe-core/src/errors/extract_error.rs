use super::error_code::{self, StayframeErrorCode};
use super::StorageError;

/// Stage-level extraction failures. Per-row problems are never errors;
/// they are counted in the extraction stats instead.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("cohort has no encounters with a usable admission time ({excluded} excluded)")]
    EmptyCohort { excluded: usize },

    #[error("cohort has no `intime` column and no stays file was configured")]
    AdmissionTimesUnavailable,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StayframeErrorCode for ExtractError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyCohort { .. } => error_code::EMPTY_COHORT,
            Self::AdmissionTimesUnavailable => error_code::ADMISSION_TIMES_UNAVAILABLE,
            Self::Storage(e) => e.error_code(),
        }
    }
}
