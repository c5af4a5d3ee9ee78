//! Column resolution and per-field coercion of raw event records.

use csv::StringRecord;
use stayframe_core::coerce::{normalize_id, parse_item_code, parse_timestamp, parse_value};
use stayframe_core::errors::StorageError;
use stayframe_core::EventRow;
use stayframe_storage::CsvBatchReader;

pub(crate) const SUBJECT_COLUMN: &str = "subject_id";
pub(crate) const ITEM_COLUMN: &str = "itemid";
pub(crate) const VALUE_COLUMN: &str = "valuenum";

/// Positions of the four event fields in a source's header.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EventColumns {
    subject: usize,
    item: usize,
    value: usize,
    time: usize,
}

impl EventColumns {
    pub(crate) fn resolve(reader: &CsvBatchReader, time_column: &str) -> Result<Self, StorageError> {
        Ok(Self {
            subject: reader.column_index(SUBJECT_COLUMN)?,
            item: reader.column_index(ITEM_COLUMN)?,
            value: reader.column_index(VALUE_COLUMN)?,
            time: reader.column_index(time_column)?,
        })
    }

    /// Cleaned subject id, borrowed from the record.
    pub(crate) fn subject<'r>(&self, record: &'r StringRecord) -> Option<&'r str> {
        record.get(self.subject).and_then(normalize_id)
    }

    /// Coerce every field; failures become `None`.
    pub(crate) fn decode(&self, subject_id: &str, record: &StringRecord) -> EventRow {
        EventRow {
            subject_id: subject_id.to_string(),
            item_code: record.get(self.item).and_then(parse_item_code),
            value: record.get(self.value).and_then(parse_value),
            charttime: record.get(self.time).and_then(parse_timestamp),
        }
    }
}
