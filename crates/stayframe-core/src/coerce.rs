//! Per-field coercion of string-typed source data.
//!
//! Every function here is total: a field that cannot be coerced becomes
//! `None` and the caller decides whether the row survives.

use chrono::{NaiveDate, NaiveDateTime};

/// Formats accepted for event and admission timestamps, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Format used when writing timestamps to artifacts.
/// `%.f` prints nothing when the fractional part is zero.
pub const TIMESTAMP_OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Normalize an identifier: trim whitespace and drop a trailing `.0`
/// left behind by spreadsheet float export. Empty input yields `None`.
pub fn clean_id(raw: &str) -> Option<String> {
    normalize_id(raw).map(str::to_string)
}

/// Borrowing form of [`clean_id`], for hot paths that mostly discard.
pub fn normalize_id(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let cleaned = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Parse a timestamp in any accepted format. A bare date maps to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_OUTPUT_FORMAT).to_string()
}

/// Parse a finite float. `NaN` and infinities are treated as missing.
pub fn parse_value(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse an item code. Integral floats (`"51265.0"`) are accepted,
/// fractional ones are not.
pub fn parse_item_code(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if let Ok(code) = raw.parse::<i64>() {
        return Some(code);
    }
    let as_float = parse_value(raw)?;
    if as_float.fract() == 0.0 && as_float.abs() < i64::MAX as f64 {
        Some(as_float as i64)
    } else {
        None
    }
}

/// Serde adapter for artifact timestamp columns.
pub mod serde_timestamp {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("unparseable timestamp: {raw:?}")))
    }
}
