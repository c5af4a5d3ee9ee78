//! Any sequence of deduplicated merges keeps the WideTable's row count.

use chrono::NaiveDate;
use proptest::prelude::*;
use stayframe_core::{CohortRecord, VariableRow};
use stayframe_merge::{DedupedVariable, ProgressiveMerger, WideTable};

fn row(stay: u8, value: f64) -> VariableRow {
    VariableRow {
        stay_id: format!("S{stay}"),
        value,
        charttime: NaiveDate::from_ymd_opt(2150, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn merges_never_change_row_count(
        cohort_stays in prop::collection::vec(0u8..40, 1..30),
        variables in prop::collection::vec(prop::collection::vec((0u8..60, -100.0f64..100.0), 0..50), 1..5),
        batch_size in 1usize..8,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let wide = dir.path().join("wide.csv");
        let records: Vec<CohortRecord> = cohort_stays
            .iter()
            .map(|s| CohortRecord::new(format!("P{s}"), format!("H{s}"), format!("S{s}"), None))
            .collect();
        let table = WideTable::initialize(&wide, &records).unwrap();
        let base_rows = table.row_count().unwrap();

        let merger = ProgressiveMerger::new(&wide, batch_size);
        for (i, rows) in variables.iter().enumerate() {
            let rows: Vec<VariableRow> = rows.iter().map(|(s, v)| row(*s, *v)).collect();
            let variable = DedupedVariable::keep_first(format!("v{i}"), &rows);
            prop_assert_eq!(merger.merge(&variable).unwrap(), base_rows);
        }
        prop_assert_eq!(table.row_count().unwrap(), base_rows);
        prop_assert_eq!(table.columns().unwrap().len(), 3 + variables.len());
    }
}
