//! Staged artifact writes.
//!
//! Every artifact is written to `<target>.tmp` beside its destination and
//! published with a single rename. Readers only ever see the previous
//! version or the complete new one. A writer that dies before publishing
//! leaves the previous version intact and orphans the staging file.

use std::ffi::OsString;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;
use stayframe_core::errors::StorageError;

const STAGING_SUFFIX: &str = ".tmp";

/// `<target>.tmp`, in the same directory so the rename stays on one filesystem.
pub fn staging_path(target: &Path) -> PathBuf {
    let mut name: OsString = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(STAGING_SUFFIX);
    target.with_file_name(name)
}

pub fn is_staging_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(STAGING_SUFFIX))
}

/// An artifact being written. Nothing is visible at `target` until
/// [`StagedFile::publish`] (or [`SealedArtifact::publish`]) runs.
pub struct StagedFile {
    target: PathBuf,
    staged: PathBuf,
    writer: csv::Writer<BufWriter<File>>,
    rows: u64,
}

impl StagedFile {
    /// Create (or truncate) the staging file for `target`.
    pub fn create(target: &Path) -> Result<Self, StorageError> {
        let staged = staging_path(target);
        let file = File::create(&staged).map_err(|e| StorageError::io(&staged, e))?;
        // Headers are written explicitly so header-only artifacts come out right.
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));

        Ok(Self {
            target: target.to_path_buf(),
            staged,
            writer,
            rows: 0,
        })
    }

    /// Data rows written so far (the header is not counted).
    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    pub fn write_header<I, T>(&mut self, header: I) -> Result<(), StorageError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer
            .write_record(header)
            .map_err(|e| StorageError::csv(&self.staged, e))
    }

    pub fn write_record<I, T>(&mut self, record: I) -> Result<(), StorageError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer
            .write_record(record)
            .map_err(|e| StorageError::csv(&self.staged, e))?;
        self.rows += 1;
        Ok(())
    }

    pub fn serialize<T: Serialize>(&mut self, row: &T) -> Result<(), StorageError> {
        self.writer
            .serialize(row)
            .map_err(|e| StorageError::csv(&self.staged, e))?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and fsync the staging file without publishing it.
    pub fn seal(self) -> Result<SealedArtifact, StorageError> {
        let Self {
            target,
            staged,
            writer,
            rows,
        } = self;

        let buffered = writer.into_inner().map_err(|e| {
            StorageError::io(&staged, std::io::Error::new(e.error().kind(), e.to_string()))
        })?;
        let file = buffered
            .into_inner()
            .map_err(|e| StorageError::io(&staged, e.into_error()))?;
        file.sync_all().map_err(|e| StorageError::io(&staged, e))?;

        Ok(SealedArtifact {
            target,
            staged,
            rows,
        })
    }

    /// Seal and publish in one step. Returns the number of data rows.
    pub fn publish(self) -> Result<u64, StorageError> {
        self.seal()?.publish()
    }
}

/// A fully written staging file awaiting its rename.
#[derive(Debug)]
pub struct SealedArtifact {
    target: PathBuf,
    staged: PathBuf,
    rows: u64,
}

impl SealedArtifact {
    pub fn staged_path(&self) -> &Path {
        &self.staged
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Atomically replace `target` with the staged file.
    pub fn publish(self) -> Result<u64, StorageError> {
        std::fs::rename(&self.staged, &self.target).map_err(|source| {
            StorageError::PublishFailed {
                staged: self.staged.clone(),
                target: self.target.clone(),
                source,
            }
        })?;
        tracing::debug!(path = %self.target.display(), rows = self.rows, "published artifact");
        Ok(self.rows)
    }
}
