//! Bounded-batch extraction of per-variable tables from one event source.
//!
//! The source is read `batch_size` rows at a time. Each row is resolved to
//! an encounter through the [`CohortIndex`], then routed to every variable
//! whose code set contains its item code. Matched rows accumulate per
//! variable across all batches; only the batch buffer is bounded.

use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use stayframe_core::config::{SourceConfig, VariableSpec};
use stayframe_core::errors::ExtractError;
use stayframe_core::{ItemCode, VariableRow};
use stayframe_storage::{write_variable_table, CsvBatchReader};

use crate::decode::EventColumns;
use crate::index::CohortIndex;

const PROGRESS_EVERY_BATCHES: u64 = 10;

/// Per-source counters. Row-level failures land here instead of aborting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub rows_read: u64,
    pub batches: u64,
    /// Subject not present in the cohort.
    pub unknown_subject: u64,
    pub unparseable_time: u64,
    /// Known subject, but no encounter window contains the timestamp.
    pub outside_window: u64,
    /// Resolved to an encounter outside the eligible set.
    pub ineligible_stay: u64,
    pub unparseable_item: u64,
    /// Valid item code that no variable asks for.
    pub unmatched_item: u64,
    /// Routed to at least one variable but carried no usable value.
    pub missing_value: u64,
    /// Rows appended, summed over variables.
    pub matched: u64,
}

impl ExtractionStats {
    pub fn coercion_failures(&self) -> u64 {
        self.unparseable_time + self.unparseable_item + self.missing_value
    }

    pub fn discarded(&self) -> u64 {
        self.unknown_subject
            + self.unparseable_time
            + self.outside_window
            + self.ineligible_stay
            + self.unparseable_item
            + self.unmatched_item
            + self.missing_value
    }
}

/// Matched rows for one variable, duplicates retained, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableTable {
    pub name: String,
    pub rows: Vec<VariableRow>,
}

impl VariableTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Tables in variable declaration order, plus the run's counters.
#[derive(Debug, Clone)]
pub struct ExtractionOutput {
    pub tables: Vec<VariableTable>,
    pub stats: ExtractionStats,
}

impl ExtractionOutput {
    pub fn table(&self, name: &str) -> Option<&VariableTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Publish every table as `<temp_dir>/<source>_<variable>.csv`.
    /// Empty tables are written header-only.
    pub fn persist(&self, source: &SourceConfig, temp_dir: &Path) -> Result<Vec<PathBuf>, ExtractError> {
        let mut written = Vec::with_capacity(self.tables.len());
        for table in &self.tables {
            let path = temp_dir.join(source.artifact_name(&table.name));
            let rows = write_variable_table(&path, &table.rows)?;
            tracing::info!(
                source = %source.name,
                variable = %table.name,
                rows,
                path = %path.display(),
                "saved variable table"
            );
            written.push(path);
        }
        Ok(written)
    }
}

/// Item code → indices of the variables that collect it.
type Routes = FxHashMap<ItemCode, SmallVec<[usize; 2]>>;

fn build_routes(variables: &[VariableSpec]) -> Routes {
    let mut routes = Routes::default();
    for (idx, variable) in variables.iter().enumerate() {
        if variable.codes.is_empty() {
            tracing::warn!(variable = %variable.name, "variable has no item codes, its table will be empty");
        }
        for &code in variable.codes.as_slice() {
            let slot = routes.entry(code).or_default();
            if !slot.contains(&idx) {
                slot.push(idx);
            }
        }
    }
    routes
}

/// Streams one event source against a built [`CohortIndex`].
pub struct StreamingWindowedExtractor<'a> {
    index: &'a CohortIndex,
    eligible: &'a FxHashSet<String>,
    batch_size: usize,
}

impl<'a> StreamingWindowedExtractor<'a> {
    pub fn new(index: &'a CohortIndex, eligible: &'a FxHashSet<String>, batch_size: usize) -> Self {
        Self {
            index,
            eligible,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Scan `path` to exhaustion and collect one table per variable.
    ///
    /// A missing file or a missing required column is fatal. Everything
    /// wrong with an individual row is counted in [`ExtractionStats`].
    pub fn extract(
        &self,
        path: &Path,
        time_column: &str,
        variables: &[VariableSpec],
    ) -> Result<ExtractionOutput, ExtractError> {
        let mut reader = CsvBatchReader::open(path, self.batch_size)?;
        let columns = EventColumns::resolve(&reader, time_column)?;
        let routes = build_routes(variables);

        let mut accumulators: Vec<Vec<VariableRow>> = vec![Vec::new(); variables.len()];
        let mut stats = ExtractionStats::default();
        let mut batch = Vec::with_capacity(self.batch_size);

        tracing::info!(
            path = %path.display(),
            variables = variables.len(),
            batch_size = self.batch_size,
            "extracting"
        );

        while reader.next_batch(&mut batch)? {
            for record in &batch {
                let Some(subject_id) = columns.subject(record) else {
                    stats.unknown_subject += 1;
                    continue;
                };
                if !self.index.contains_subject(subject_id) {
                    stats.unknown_subject += 1;
                    continue;
                }

                let event = columns.decode(subject_id, record);
                let Some(charttime) = event.charttime else {
                    stats.unparseable_time += 1;
                    tracing::trace!(subject_id, "discarding row with unparseable timestamp");
                    continue;
                };
                let Some(stay_id) = self.index.lookup(subject_id, charttime) else {
                    stats.outside_window += 1;
                    continue;
                };
                if !self.eligible.contains(stay_id) {
                    stats.ineligible_stay += 1;
                    continue;
                }

                let Some(code) = event.item_code else {
                    stats.unparseable_item += 1;
                    continue;
                };
                let Some(targets) = routes.get(&code) else {
                    stats.unmatched_item += 1;
                    continue;
                };
                let Some(value) = event.value else {
                    stats.missing_value += 1;
                    tracing::trace!(stay_id, code, "dropping matched row without a value");
                    continue;
                };

                for &idx in targets {
                    accumulators[idx].push(VariableRow {
                        stay_id: stay_id.to_string(),
                        value,
                        charttime,
                    });
                    stats.matched += 1;
                }
            }

            stats.batches = reader.batches_read();
            if stats.batches % PROGRESS_EVERY_BATCHES == 0 {
                tracing::info!(
                    batches = stats.batches,
                    rows = reader.rows_read(),
                    matched = stats.matched,
                    "extraction progress"
                );
            }
        }

        stats.rows_read = reader.rows_read();
        stats.batches = reader.batches_read();

        let tables: Vec<VariableTable> = variables
            .iter()
            .zip(accumulators)
            .map(|(variable, rows)| VariableTable {
                name: variable.name.clone(),
                rows,
            })
            .collect();

        tracing::info!(
            path = %path.display(),
            rows_read = stats.rows_read,
            batches = stats.batches,
            matched = stats.matched,
            unknown_subject = stats.unknown_subject,
            outside_window = stats.outside_window,
            ineligible_stay = stats.ineligible_stay,
            coercion_failures = stats.coercion_failures(),
            "extraction complete"
        );
        for table in &tables {
            tracing::debug!(variable = %table.name, rows = table.len(), "variable matched");
        }

        Ok(ExtractionOutput { tables, stats })
    }

    /// Extract one configured source and publish its tables into `temp_dir`.
    pub fn run_source(
        &self,
        source: &SourceConfig,
        source_path: &Path,
        temp_dir: &Path,
    ) -> Result<ExtractionStats, ExtractError> {
        let output = self.extract(source_path, &source.time_column, &source.variables)?;
        output.persist(source, temp_dir)?;
        Ok(output.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stayframe_core::config::CodeSet;

    #[test]
    fn routes_union_codes_and_fan_out_shared_codes() {
        let variables = vec![
            VariableSpec::new("fio2", CodeSet::Many(vec![223835, 3420, 3420])),
            VariableSpec::new("fio2_chart", CodeSet::One(223835)),
            VariableSpec::new("nothing", CodeSet::Many(vec![])),
        ];
        let routes = build_routes(&variables);

        assert_eq!(routes[&223835].as_slice(), &[0, 1]);
        assert_eq!(routes[&3420].as_slice(), &[0]);
        assert_eq!(routes.len(), 2);
    }

    #[test]
    fn discarded_sums_every_drop_reason() {
        let stats = ExtractionStats {
            unknown_subject: 1,
            unparseable_time: 2,
            outside_window: 3,
            ineligible_stay: 4,
            unparseable_item: 5,
            unmatched_item: 6,
            missing_value: 7,
            ..Default::default()
        };
        assert_eq!(stats.discarded(), 28);
        assert_eq!(stats.coercion_failures(), 14);
    }
}
