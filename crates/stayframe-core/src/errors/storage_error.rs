//! Artifact-layer errors: reading sources, writing and publishing tables.

use std::path::PathBuf;

use super::error_code::{self, StayframeErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} has no `{column}` column")]
    MissingColumn { path: PathBuf, column: String },

    #[error("publishing {staged} to {target} failed: {source}")]
    PublishFailed {
        staged: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Wrap an I/O error, promoting `NotFound` to its own variant.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// Wrap a CSV error, keeping a missing file distinguishable.
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        let path = path.into();
        if let csv::ErrorKind::Io(io) = source.kind() {
            if io.kind() == std::io::ErrorKind::NotFound {
                return Self::NotFound { path };
            }
        }
        Self::Csv { path, source }
    }
}

impl StayframeErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::Io { .. } => error_code::IO_ERROR,
            Self::Csv { .. } => error_code::CSV_ERROR,
            Self::MissingColumn { .. } => error_code::MISSING_COLUMN,
            Self::PublishFailed { .. } => error_code::PUBLISH_FAILED,
        }
    }
}
