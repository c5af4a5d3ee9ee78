use super::{ConfigError, ExtractError, MergeError, StayframeErrorCode, StorageError};

/// Top-level error type for a stayframe run.
/// All stage errors convert into this via `From` impls.
#[derive(Debug, thiserror::Error)]
pub enum StayframeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("merge failed: {0}")]
    Merge(#[from] MergeError),
}

impl StayframeErrorCode for StayframeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Extract(e) => e.error_code(),
            Self::Merge(e) => e.error_code(),
        }
    }
}

/// Convenience type alias.
pub type StayframeResult<T> = Result<T, StayframeError>;
