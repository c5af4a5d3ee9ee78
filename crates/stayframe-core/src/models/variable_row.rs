use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One matched measurement in a VariableTable artifact.
///
/// Column order on disk is `stay_id,value,charttime`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableRow {
    pub stay_id: String,
    pub value: f64,
    #[serde(with = "crate::coerce::serde_timestamp")]
    pub charttime: NaiveDateTime,
}

impl VariableRow {
    pub const HEADER: [&'static str; 3] = ["stay_id", "value", "charttime"];
}
