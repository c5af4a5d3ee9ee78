pub mod defaults;
pub mod merge_config;
pub mod paths_config;
pub mod processing_config;
pub mod source_config;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use merge_config::MergeStep;
pub use paths_config::PathsConfig;
pub use processing_config::ProcessingConfig;
pub use source_config::{CodeSet, SourceConfig, VariableSpec};

use crate::errors::ConfigError;
use crate::models::{ID_COLUMNS, INTIME_COLUMN};

/// Run configuration, threaded explicitly through index build,
/// extraction and merging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StayframeConfig {
    pub paths: PathsConfig,
    pub processing: ProcessingConfig,
    pub sources: Vec<SourceConfig>,
    /// Explicit merge order. Empty means "every extracted variable, in
    /// source then variable declaration order".
    pub merge: Vec<MergeStep>,
}

impl Default for StayframeConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            processing: ProcessingConfig::default(),
            sources: defaults::default_sources(),
            merge: Vec::new(),
        }
    }
}

impl StayframeConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.batch_size == 0 {
            return Err(ConfigError::Invalid("batch_size must be positive".into()));
        }

        let mut source_names = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(ConfigError::Invalid("source name must not be empty".into()));
            }
            if source.time_column.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "source `{}` has an empty time_column",
                    source.name
                )));
            }
            if !source_names.insert(source.name.as_str()) {
                return Err(ConfigError::DuplicateName {
                    kind: "source",
                    name: source.name.clone(),
                });
            }
            let mut variable_names = HashSet::new();
            for variable in &source.variables {
                if variable.name.trim().is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "source `{}` has a variable with an empty name",
                        source.name
                    )));
                }
                if !variable_names.insert(variable.name.as_str()) {
                    return Err(ConfigError::DuplicateName {
                        kind: "variable",
                        name: format!("{}.{}", source.name, variable.name),
                    });
                }
            }
        }

        let mut columns = HashSet::new();
        for step in self.merge_plan() {
            if ID_COLUMNS.contains(&step.column.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "merge column `{}` collides with an identifier column",
                    step.column
                )));
            }
            if !columns.insert(step.column.clone()) {
                return Err(ConfigError::DuplicateName {
                    kind: "merge column",
                    name: step.column,
                });
            }
        }
        Ok(())
    }

    /// The ordered merge plan, explicit or derived from `sources`.
    pub fn merge_plan(&self) -> Vec<MergeStep> {
        if !self.merge.is_empty() {
            return self.merge.clone();
        }
        self.sources
            .iter()
            .flat_map(|source| {
                source
                    .variables
                    .iter()
                    .map(move |v| MergeStep::new(source.artifact_name(&v.name), v.name.clone()))
            })
            .collect()
    }

    pub fn source_path(&self, source: &SourceConfig) -> PathBuf {
        self.paths.resolve(&source.path)
    }

    /// Required inputs that do not exist on disk. The stays table is only
    /// required when the cohort file has no admission time column.
    pub fn missing_paths(&self) -> Vec<PathBuf> {
        let cohort = self.paths.cohort_path();
        let stays = if cohort_has_intime(&cohort) {
            None
        } else {
            self.paths.stays_path()
        };
        let mut required = vec![cohort];
        required.extend(stays);
        required.extend(self.sources.iter().map(|s| self.source_path(s)));
        required.into_iter().filter(|p| !p.exists()).collect()
    }

    /// Create the artifact directory and the WideTable's parent directory.
    pub fn create_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.paths.temp_dir_path())?;
        if let Some(parent) = self.paths.output_path().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

/// Whether the cohort header names an admission time column. An unreadable
/// cohort counts as not having one.
fn cohort_has_intime(cohort: &Path) -> bool {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(cohort)
        .and_then(|mut reader| {
            reader
                .headers()
                .map(|headers| headers.iter().any(|h| h == INTIME_COLUMN))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_and_matches_reference_constants() {
        let config = StayframeConfig::default();
        config.validate().unwrap();
        assert_eq!(config.processing.batch_size, 100_000);
        assert_eq!(config.processing.window_hours, 24);
        assert_eq!(config.sources.len(), 2);
        let fio2 = config.sources[1]
            .variables
            .iter()
            .find(|v| v.name == "fio2")
            .unwrap();
        assert_eq!(fio2.codes.as_slice(), &[223835, 3420]);
    }

    #[test]
    fn derived_merge_plan_follows_declaration_order() {
        let config = StayframeConfig::default();
        let plan = config.merge_plan();
        assert_eq!(plan.len(), 10);
        assert_eq!(plan[0], MergeStep::new("lab_platelet.csv", "platelet"));
        assert_eq!(plan[9], MergeStep::new("chart_fio2.csv", "fio2"));
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let mut config = StayframeConfig::default();
        config.processing.batch_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn merge_column_colliding_with_identifier_is_rejected() {
        let mut config = StayframeConfig::default();
        config.merge = vec![MergeStep::new("lab_platelet.csv", "stay_id")];
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn duplicate_variable_in_one_source_is_rejected() {
        let mut config = StayframeConfig::default();
        config.sources[0]
            .variables
            .push(VariableSpec::new("platelet", CodeSet::One(1)));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateName { kind: "variable", .. })
        ));
    }

    #[test]
    fn relative_paths_resolve_against_base_dir() {
        let mut config = StayframeConfig::default();
        config.paths.base_dir = PathBuf::from("/data/mimic");
        assert_eq!(
            config.paths.cohort_path(),
            PathBuf::from("/data/mimic/cohort_definition.csv")
        );
        assert_eq!(
            config.paths.artifact_path("lab_platelet.csv"),
            PathBuf::from("/data/mimic/temp_merge_files/lab_platelet.csv")
        );
        config.paths.output = PathBuf::from("/elsewhere/out.csv");
        assert_eq!(config.paths.output_path(), PathBuf::from("/elsewhere/out.csv"));
    }
}
