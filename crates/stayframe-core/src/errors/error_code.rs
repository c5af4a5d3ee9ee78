//! Stable, machine-readable error codes.

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONFIG_PARSE_ERROR: &str = "CONFIG_PARSE_ERROR";
pub const IO_ERROR: &str = "IO_ERROR";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const CSV_ERROR: &str = "CSV_ERROR";
pub const MISSING_COLUMN: &str = "MISSING_COLUMN";
pub const PUBLISH_FAILED: &str = "PUBLISH_FAILED";
pub const EMPTY_COHORT: &str = "EMPTY_COHORT";
pub const ADMISSION_TIMES_UNAVAILABLE: &str = "ADMISSION_TIMES_UNAVAILABLE";
pub const DUPLICATE_KEY: &str = "DUPLICATE_KEY";
pub const COLUMN_ALREADY_MERGED: &str = "COLUMN_ALREADY_MERGED";
pub const ROW_COUNT_CHANGED: &str = "ROW_COUNT_CHANGED";
pub const RESERVED_COLUMN: &str = "RESERVED_COLUMN";

/// Every error type in the workspace maps to one of the codes above.
pub trait StayframeErrorCode {
    fn error_code(&self) -> &'static str;
}
