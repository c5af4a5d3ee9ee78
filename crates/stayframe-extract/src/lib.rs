//! # stayframe-extract
//!
//! Resolves timestamped events to cohort encounters and streams large
//! event logs into per-variable tables.
//!
//! - [`CohortIndex`]: subject → ordered encounter windows, first-match lookup.
//! - [`load_cohort`]: cohort definition (+ optional stays table) → records.
//! - [`StreamingWindowedExtractor`]: batch scan, window filter, code routing.

pub mod cohort;
mod decode;
pub mod extractor;
pub mod index;

pub use cohort::{eligible_stays, load_cohort, LoadedCohort};
pub use extractor::{ExtractionOutput, ExtractionStats, StreamingWindowedExtractor, VariableTable};
pub use index::{CohortIndex, EncounterWindow, IndexBuildStats};
