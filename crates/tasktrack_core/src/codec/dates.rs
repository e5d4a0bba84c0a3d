//! Date-field revival for decoded JSON trees.

use super::{CodecError, CodecResult};
use crate::model::Timestamp;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

/// Parses the textual date forms found in persisted blobs.
///
/// Accepts RFC 3339, the signed extended-year form chrono writes outside
/// years 0..=9999 (`+10000-01-01T00:00:00Z`), date-only `YYYY-MM-DD`
/// (midnight UTC) and offset-less `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC).
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = trimmed.parse::<DateTime<FixedOffset>>() {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Rewrites every field named in `date_fields`, at any depth, into canonical
/// RFC 3339 text that typed decoding reads as a `Timestamp`.
///
/// Numbers are read as epoch milliseconds. Any other value under a date
/// field is an error.
pub fn revive_date_fields(value: &mut Value, date_fields: &[&str]) -> CodecResult<()> {
    match value {
        Value::Object(map) => {
            for (field, child) in map.iter_mut() {
                if date_fields.contains(&field.as_str()) {
                    let revived = revive_one(field, child)?;
                    *child = Value::String(revived.to_rfc3339_opts(SecondsFormat::AutoSi, true));
                } else {
                    revive_date_fields(child, date_fields)?;
                }
            }
            Ok(())
        }
        Value::Array(items) => items
            .iter_mut()
            .try_for_each(|item| revive_date_fields(item, date_fields)),
        _ => Ok(()),
    }
}

fn revive_one(field: &str, value: &Value) -> CodecResult<Timestamp> {
    let revived = match value {
        Value::String(text) => parse_timestamp(text),
        Value::Number(number) => number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    };
    revived.ok_or_else(|| CodecError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}
