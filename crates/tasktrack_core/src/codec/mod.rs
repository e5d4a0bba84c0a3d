//! Text encoding for persisted collections.
//!
//! # Responsibility
//! - Encode a collection into a versioned JSON envelope.
//! - Decode envelopes (and legacy bare arrays) into typed collections.
//! - Revive date fields by name so every timestamp decodes as a calendar
//!   value regardless of how it was written.
//!
//! # Invariants
//! - `try_decode(key, encode(key, x)) == x` for every valid collection.
//! - Decoding never panics; `decode` reports failure as `None` so callers
//!   can fall back to seed data.
//! - Envelope `schema` must equal the storage key and `version` must equal
//!   `BLOB_VERSION`; no migration is attempted.
//!
//! # See also
//! - docs/architecture/persistence.md

mod dates;

pub use dates::{parse_timestamp, revive_date_fields};

use crate::storage::StorageKey;
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field names revived into timestamps at any nesting depth.
pub const DATE_FIELD_NAMES: &[&str] = &["dueDate", "startDate", "endDate", "createdAt"];

/// Current persisted envelope version.
pub const BLOB_VERSION: u32 = 1;

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug)]
pub enum CodecError {
    Encode(serde_json::Error),
    /// Text is not JSON.
    Malformed(serde_json::Error),
    SchemaMismatch { expected: StorageKey, found: String },
    UnsupportedVersion { found: u64, supported: u32 },
    InvalidDate { field: String, value: String },
    /// JSON does not match the collection type.
    Shape(String),
}

impl CodecError {
    /// Stable code for log events.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Encode(_) => "encode_failed",
            Self::Malformed(_) => "malformed_text",
            Self::SchemaMismatch { .. } => "schema_mismatch",
            Self::UnsupportedVersion { .. } => "unsupported_version",
            Self::InvalidDate { .. } => "invalid_date",
            Self::Shape(_) => "shape_mismatch",
        }
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode collection: {err}"),
            Self::Malformed(err) => write!(f, "persisted blob is not valid JSON: {err}"),
            Self::SchemaMismatch { expected, found } => write!(
                f,
                "persisted blob schema `{found}` does not match key `{expected}`"
            ),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "persisted blob version {found} is not supported (expected {supported})"
            ),
            Self::InvalidDate { field, value } => {
                write!(f, "field `{field}` holds an invalid date: {value}")
            }
            Self::Shape(message) => write!(f, "persisted blob has unexpected shape: {message}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) | Self::Malformed(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    schema: &'a str,
    version: u32,
    items: &'a [T],
}

#[derive(Deserialize)]
struct EnvelopeHeader {
    schema: String,
    version: u64,
}

/// Encodes one collection into its persisted envelope.
pub fn encode<T: Serialize>(key: StorageKey, items: &[T]) -> CodecResult<String> {
    serde_json::to_string(&EnvelopeRef {
        schema: key.as_str(),
        version: BLOB_VERSION,
        items,
    })
    .map_err(CodecError::Encode)
}

/// Decodes one collection, reporting the exact failure.
///
/// Accepts the versioned envelope or a legacy bare array. Date fields named
/// in `date_fields` are revived before typed decoding.
pub fn try_decode<T: DeserializeOwned>(
    key: StorageKey,
    text: &str,
    date_fields: &[&str],
) -> CodecResult<Vec<T>> {
    let root: Value = serde_json::from_str(text).map_err(CodecError::Malformed)?;
    let mut items = match root {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => {
            let items = map
                .remove("items")
                .ok_or_else(|| CodecError::Shape("envelope has no `items`".to_string()))?;
            let header: EnvelopeHeader = serde_json::from_value(Value::Object(map))
                .map_err(|err| CodecError::Shape(err.to_string()))?;
            if header.schema != key.as_str() {
                return Err(CodecError::SchemaMismatch {
                    expected: key,
                    found: header.schema,
                });
            }
            if header.version != u64::from(BLOB_VERSION) {
                return Err(CodecError::UnsupportedVersion {
                    found: header.version,
                    supported: BLOB_VERSION,
                });
            }
            items
        }
        other => {
            return Err(CodecError::Shape(format!(
                "expected array or envelope, got {}",
                json_kind(&other)
            )));
        }
    };

    revive_date_fields(&mut items, date_fields)?;
    serde_json::from_value(items).map_err(|err| CodecError::Shape(err.to_string()))
}

/// Decodes one collection, returning `None` when the caller should fall back.
///
/// Failures are logged (metadata only) and never propagated.
pub fn decode<T: DeserializeOwned>(
    key: StorageKey,
    text: &str,
    date_fields: &[&str],
) -> Option<Vec<T>> {
    match try_decode(key, text, date_fields) {
        Ok(items) => Some(items),
        Err(err) => {
            warn!(
                "event=blob_decode module=codec status=fallback key={} bytes={} error_code={} error={}",
                key,
                text.len(),
                err.error_code(),
                err
            );
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
