//! One value per encounter.

use std::path::Path;

use rustc_hash::FxHashMap;
use stayframe_core::errors::MergeError;
use stayframe_core::VariableRow;
use stayframe_storage::LoadedVariableTable;

/// A variable reduced to at most one value per `stay_id`.
///
/// Construction is the only way to obtain one, so the merger never sees
/// a table that could fan out a join.
#[derive(Debug, Clone)]
pub struct DedupedVariable {
    name: String,
    values: FxHashMap<String, f64>,
    dropped: usize,
}

impl DedupedVariable {
    /// Keep the first row per stay in storage order. Later rows for the
    /// same stay are dropped regardless of their timestamps.
    pub fn keep_first(name: impl Into<String>, rows: &[VariableRow]) -> Self {
        let mut values = FxHashMap::default();
        let mut dropped = 0;
        for row in rows {
            if values.contains_key(&row.stay_id) {
                dropped += 1;
                continue;
            }
            values.insert(row.stay_id.clone(), row.value);
        }
        Self {
            name: name.into(),
            values,
            dropped,
        }
    }

    /// Accept a table that is already unique per stay.
    pub fn from_unique(name: impl Into<String>, rows: &[VariableRow]) -> Result<Self, MergeError> {
        let name = name.into();
        let mut values = FxHashMap::default();
        for row in rows {
            if values.insert(row.stay_id.clone(), row.value).is_some() {
                return Err(MergeError::DuplicateKey {
                    variable: name,
                    stay_id: row.stay_id.clone(),
                });
            }
        }
        Ok(Self {
            name,
            values,
            dropped: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, stay_id: &str) -> Option<f64> {
        self.values.get(stay_id).copied()
    }

    /// Distinct stays with a value.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rows discarded by [`DedupedVariable::keep_first`].
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// Read a VariableTable artifact fully into memory. Rows that cannot
/// be joined are skipped and counted rather than failing the merge.
pub fn load_variable_table(path: &Path) -> Result<LoadedVariableTable, MergeError> {
    Ok(stayframe_storage::read_variable_table(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(stay: &str, value: f64, hour: u32) -> VariableRow {
        VariableRow {
            stay_id: stay.to_string(),
            value,
            charttime: NaiveDate::from_ymd_opt(2150, 1, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn keep_first_uses_storage_order_not_time() {
        // The second row is chronologically earlier but stored later.
        let rows = vec![row("A", 5.0, 9), row("A", 9.0, 1), row("B", 1.0, 0)];
        let deduped = DedupedVariable::keep_first("platelet", &rows);

        assert_eq!(deduped.get("A"), Some(5.0));
        assert_eq!(deduped.get("B"), Some(1.0));
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped.dropped(), 1);
    }

    #[test]
    fn from_unique_rejects_duplicate_keys() {
        let rows = vec![row("A", 5.0, 0), row("A", 9.0, 1)];
        match DedupedVariable::from_unique("platelet", &rows) {
            Err(MergeError::DuplicateKey { variable, stay_id }) => {
                assert_eq!(variable, "platelet");
                assert_eq!(stay_id, "A");
            }
            other => panic!("expected DuplicateKey, got {other:?}"),
        }
    }

    #[test]
    fn from_unique_accepts_unique_table() {
        let rows = vec![row("A", 5.0, 0), row("B", 9.0, 1)];
        let deduped = DedupedVariable::from_unique("platelet", &rows).unwrap();
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped.dropped(), 0);
    }
}
