//! Ordered merge sequence for one run.

use std::path::Path;

use stayframe_core::config::MergeStep;
use stayframe_core::errors::MergeError;
use stayframe_core::{CohortRecord, StayframeConfig};

use crate::dedup::{load_variable_table, DedupedVariable};
use crate::merger::ProgressiveMerger;
use crate::wide_table::WideTable;

/// Artifacts to merge and the columns they become, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    pub steps: Vec<MergeStep>,
}

impl MergePlan {
    pub fn new(steps: Vec<MergeStep>) -> Self {
        Self { steps }
    }

    pub fn from_config(config: &StayframeConfig) -> Self {
        Self::new(config.merge_plan())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Outcome of [`ProgressiveMerger::run_plan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub rows: u64,
    pub merged: Vec<String>,
    /// Columns whose artifact was not found.
    pub skipped: Vec<String>,
    /// Rows dropped by deduplication, summed over merged columns.
    pub duplicates_dropped: usize,
    /// Artifact rows that could not be joined (bad id, value or time).
    pub unusable_rows: usize,
    pub columns: Vec<String>,
}

impl ProgressiveMerger {
    /// Initialize the WideTable from `records`, then merge each planned
    /// artifact from `temp_dir` in order. Missing artifacts are skipped.
    ///
    /// An empty cohort is fatal and leaves any existing WideTable as it was.
    pub fn run_plan(
        &self,
        plan: &MergePlan,
        temp_dir: &Path,
        records: &[CohortRecord],
    ) -> Result<MergeReport, MergeError> {
        if records.is_empty() {
            return Err(MergeError::EmptyCohort);
        }
        let table = WideTable::initialize(self.path(), records)?;
        let mut report = MergeReport::default();
        let mut column_count = table.columns()?.len();

        for step in &plan.steps {
            let artifact = temp_dir.join(&step.artifact);
            if !artifact.exists() {
                tracing::warn!(
                    artifact = %artifact.display(),
                    column = %step.column,
                    "variable table not found, skipping"
                );
                report.skipped.push(step.column.clone());
                continue;
            }

            let loaded = load_variable_table(&artifact)?;
            report.unusable_rows += loaded.skipped_rows;
            let variable = DedupedVariable::keep_first(&step.column, &loaded.rows);
            if variable.dropped() > 0 {
                tracing::info!(
                    column = %step.column,
                    kept = variable.len(),
                    dropped = variable.dropped(),
                    "deduplicated variable table"
                );
            }
            report.duplicates_dropped += variable.dropped();

            report.rows = self.merge(&variable)?;
            column_count += 1;
            report.merged.push(step.column.clone());
            tracing::info!(column = %step.column, columns = column_count, "wide table updated");
        }

        report.columns = table.columns()?;
        if report.merged.is_empty() {
            report.rows = table.row_count()?;
        }
        tracing::info!(
            rows = report.rows,
            columns = ?report.columns,
            skipped = report.skipped.len(),
            "progressive merge complete"
        );
        Ok(report)
    }
}
