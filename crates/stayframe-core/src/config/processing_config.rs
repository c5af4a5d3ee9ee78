//! Batch and window settings.

use serde::{Deserialize, Serialize};

/// Configuration for batch streaming and the observation window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Rows per sequential batch, for both event sources and merge passes.
    pub batch_size: usize,
    /// Observation window length after admission, inclusive on both ends.
    pub window_hours: u32,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            batch_size: 100_000,
            window_hours: 24,
        }
    }
}

impl ProcessingConfig {
    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.window_hours))
    }
}
