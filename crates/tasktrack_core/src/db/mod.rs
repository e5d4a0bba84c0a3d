//! SQLite file behind `SqliteKeyValueStore`.
//!
//! # Responsibility
//! - Open the connection that holds one row per `StorageKey` in `kv_entries`.
//! - Bring the table layout up to the version this binary writes.
//!
//! # Invariants
//! - The layout version lives in `PRAGMA user_version`; blob contents are
//!   versioned separately by the codec envelope.
//! - A file written by a newer binary is refused rather than opened, so the
//!   store falls back to seed data instead of overwriting unknown rows.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// `user_version` is ahead of every migration this binary knows.
    SchemaTooNew { found: u32, supported: u32 },
}

impl DbError {
    /// Stable code used in `error_code=` log fields.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "kv_sqlite_failed",
            Self::SchemaTooNew { .. } => "kv_schema_too_new",
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "kv store: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "kv store layout v{found} was written by a newer build (this build supports up to v{supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
