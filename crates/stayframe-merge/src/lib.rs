//! # stayframe-merge
//!
//! Builds the WideTable: one row per cohort encounter, one column per
//! variable, grown by successive left joins.
//!
//! - [`WideTable`]: base table from unique cohort encounter keys.
//! - [`DedupedVariable`]: at most one value per encounter. The only input
//!   the merger accepts.
//! - [`ProgressiveMerger`]: batched join into a staging file, published by
//!   rename once the row count checks out.
//! - [`MergePlan`]: the ordered artifact → column sequence for a run.

pub mod dedup;
pub mod merger;
pub mod plan;
pub mod wide_table;

pub use dedup::{load_variable_table, DedupedVariable};
pub use merger::{ProgressiveMerger, StagedMerge};
pub use plan::{MergePlan, MergeReport};
pub use wide_table::WideTable;
