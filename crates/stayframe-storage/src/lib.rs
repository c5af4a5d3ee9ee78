//! # stayframe-storage
//!
//! Persistence layer for stayframe artifacts. Sources are read in
//! fixed-size batches; every artifact is written to a staging file and
//! only becomes visible through an atomic rename.

pub mod batch_reader;
pub mod cleanup;
pub mod staged;
pub mod variable_table;

pub use batch_reader::CsvBatchReader;
pub use cleanup::cleanup_orphaned_staging;
pub use staged::{staging_path, SealedArtifact, StagedFile};
pub use variable_table::{read_variable_table, write_variable_table, LoadedVariableTable};
