//! # stayframe-core
//!
//! Foundation crate for the stayframe extraction engine.
//! Defines the run configuration, errors, fixed-shape record types,
//! field coercion rules and tracing setup. Every other crate in the
//! workspace depends on this.

pub mod coerce;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;

// Re-export the most commonly used types at the crate root.
pub use config::StayframeConfig;
pub use errors::{StayframeError, StayframeErrorCode, StayframeResult};
pub use models::{CohortRecord, EventRow, ItemCode, VariableRow};
