//! Input and artifact locations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Every relative path resolves against `base_dir`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    pub base_dir: PathBuf,
    /// Cohort definition: `subject_id, hadm_id, stay_id[, intime]`.
    pub cohort: PathBuf,
    /// Stays table supplying `intime` when the cohort lacks it.
    pub stays: Option<PathBuf>,
    /// Directory holding VariableTable artifacts.
    pub temp_dir: PathBuf,
    /// The WideTable artifact.
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            cohort: PathBuf::from("cohort_definition.csv"),
            stays: Some(PathBuf::from("icustays.csv")),
            temp_dir: PathBuf::from("temp_merge_files"),
            output: PathBuf::from("temp_merge_files/progressive_merge.csv"),
        }
    }
}

impl PathsConfig {
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn cohort_path(&self) -> PathBuf {
        self.resolve(&self.cohort)
    }

    pub fn stays_path(&self) -> Option<PathBuf> {
        self.stays.as_deref().map(|p| self.resolve(p))
    }

    pub fn temp_dir_path(&self) -> PathBuf {
        self.resolve(&self.temp_dir)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output)
    }

    /// Location of a VariableTable artifact by file name.
    pub fn artifact_path(&self, file_name: &str) -> PathBuf {
        self.temp_dir_path().join(file_name)
    }
}
