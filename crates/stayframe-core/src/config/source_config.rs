//! Event sources and the variables extracted from them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::ItemCode;

/// One raw event log and its variable map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    /// Short name, used as the artifact prefix (`lab` → `lab_platelet.csv`).
    pub name: String,
    pub path: PathBuf,
    #[serde(default = "default_time_column")]
    pub time_column: String,
    #[serde(default)]
    pub variables: Vec<VariableSpec>,
}

fn default_time_column() -> String {
    "charttime".to_string()
}

impl SourceConfig {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            time_column: default_time_column(),
            variables: Vec::new(),
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, codes: CodeSet) -> Self {
        self.variables.push(VariableSpec {
            name: name.into(),
            codes,
        });
        self
    }

    pub fn artifact_name(&self, variable: &str) -> String {
        format!("{}_{}.csv", self.name, variable)
    }
}

/// A named variable and the item codes whose rows it collects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariableSpec {
    pub name: String,
    pub codes: CodeSet,
}

impl VariableSpec {
    pub fn new(name: impl Into<String>, codes: CodeSet) -> Self {
        Self {
            name: name.into(),
            codes,
        }
    }
}

/// One code, or several recorded for the same concept.
/// Written in TOML as either `codes = 51265` or `codes = [223835, 3420]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CodeSet {
    One(ItemCode),
    Many(Vec<ItemCode>),
}

impl CodeSet {
    pub fn as_slice(&self) -> &[ItemCode] {
        match self {
            Self::One(code) => std::slice::from_ref(code),
            Self::Many(codes) => codes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}
