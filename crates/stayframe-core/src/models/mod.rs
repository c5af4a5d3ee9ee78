//! Fixed-shape record types, one per pipeline stage.

mod cohort_record;
mod event_row;
mod variable_row;

pub use cohort_record::CohortRecord;
pub use event_row::EventRow;
pub use variable_row::VariableRow;

/// Identifier of what an event measured (MIMIC `itemid`).
pub type ItemCode = i64;

/// Identifier columns that lead every WideTable.
pub const ID_COLUMNS: [&str; 3] = ["subject_id", "hadm_id", "stay_id"];

/// Join key shared by VariableTables and the WideTable.
pub const STAY_KEY: &str = "stay_id";

/// Admission time column, in the cohort file or the stays table.
pub const INTIME_COLUMN: &str = "intime";
