//! Cohort definition loading.
//!
//! The cohort CSV carries `subject_id, hadm_id, stay_id` and optionally
//! `intime`. Without `intime`, admission times come from a stays table
//! (`stay_id, intime`), restricted to the cohort's stays.

use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use stayframe_core::coerce::{clean_id, parse_timestamp};
use stayframe_core::errors::ExtractError;
use stayframe_core::models::INTIME_COLUMN;
use stayframe_core::CohortRecord;
use stayframe_storage::CsvBatchReader;

const READ_BATCH: usize = 10_000;

/// Cohort records in file order, plus what was dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct LoadedCohort {
    pub records: Vec<CohortRecord>,
    /// Rows dropped for an empty subject, admission or stay id.
    pub skipped_rows: usize,
    /// Records kept with `admission: None`.
    pub missing_admission: usize,
}

pub fn load_cohort(cohort_path: &Path, stays_path: Option<&Path>) -> Result<LoadedCohort, ExtractError> {
    let mut reader = CsvBatchReader::open(cohort_path, READ_BATCH)?;
    let subject_col = reader.column_index("subject_id")?;
    let hadm_col = reader.column_index("hadm_id")?;
    let stay_col = reader.column_index("stay_id")?;
    let intime_col = reader.column_index(INTIME_COLUMN).ok();

    let mut loaded = LoadedCohort::default();
    let mut raw_intimes: Vec<Option<String>> = Vec::new();
    let mut batch = Vec::new();

    while reader.next_batch(&mut batch)? {
        for record in &batch {
            let ids = (
                record.get(subject_col).and_then(clean_id),
                record.get(hadm_col).and_then(clean_id),
                record.get(stay_col).and_then(clean_id),
            );
            let (Some(subject_id), Some(hadm_id), Some(stay_id)) = ids else {
                loaded.skipped_rows += 1;
                continue;
            };
            raw_intimes.push(intime_col.and_then(|c| record.get(c)).map(str::to_string));
            loaded
                .records
                .push(CohortRecord::new(subject_id, hadm_id, stay_id, None));
        }
    }

    if intime_col.is_some() {
        for (record, raw) in loaded.records.iter_mut().zip(&raw_intimes) {
            record.admission = raw.as_deref().and_then(parse_timestamp);
        }
    } else {
        let stays_path = stays_path.ok_or(ExtractError::AdmissionTimesUnavailable)?;
        let wanted: FxHashSet<&str> = loaded.records.iter().map(|r| r.stay_id.as_str()).collect();
        let intimes = load_admission_times(stays_path, &wanted)?;
        for record in &mut loaded.records {
            record.admission = intimes.get(record.stay_id.as_str()).copied();
        }
    }

    loaded.missing_admission = loaded.records.iter().filter(|r| r.admission.is_none()).count();

    tracing::info!(
        path = %cohort_path.display(),
        records = loaded.records.len(),
        skipped = loaded.skipped_rows,
        missing_admission = loaded.missing_admission,
        "loaded cohort"
    );
    Ok(loaded)
}

/// `stay_id → intime` for the wanted stays. The first row per stay wins;
/// unparseable times are left out.
fn load_admission_times(
    stays_path: &Path,
    wanted: &FxHashSet<&str>,
) -> Result<FxHashMap<String, chrono::NaiveDateTime>, ExtractError> {
    let mut reader = CsvBatchReader::open(stays_path, READ_BATCH)?;
    let stay_col = reader.column_index("stay_id")?;
    let intime_col = reader.column_index(INTIME_COLUMN)?;

    let mut intimes = FxHashMap::default();
    let mut batch = Vec::new();
    while reader.next_batch(&mut batch)? {
        for record in &batch {
            let Some(stay_id) = record.get(stay_col).and_then(clean_id) else {
                continue;
            };
            if !wanted.contains(stay_id.as_str()) || intimes.contains_key(&stay_id) {
                continue;
            }
            if let Some(ts) = record.get(intime_col).and_then(parse_timestamp) {
                intimes.insert(stay_id, ts);
            }
        }
    }
    Ok(intimes)
}

/// Every cohort stay id, indexed or not. The default eligible set.
pub fn eligible_stays(records: &[CohortRecord]) -> FxHashSet<String> {
    records.iter().map(|r| r.stay_id.clone()).collect()
}
