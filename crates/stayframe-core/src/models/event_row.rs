use chrono::NaiveDateTime;

use super::ItemCode;

/// One raw measurement after per-field coercion.
///
/// A field that failed coercion is `None`; the row itself is never
/// rejected at this stage.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub subject_id: String,
    pub item_code: Option<ItemCode>,
    pub value: Option<f64>,
    pub charttime: Option<NaiveDateTime>,
}
