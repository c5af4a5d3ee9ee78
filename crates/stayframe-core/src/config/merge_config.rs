use serde::{Deserialize, Serialize};

/// One progressive merge step: a VariableTable artifact in the temp
/// directory and the WideTable column it becomes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergeStep {
    pub artifact: String,
    pub column: String,
}

impl MergeStep {
    pub fn new(artifact: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            column: column.into(),
        }
    }
}
