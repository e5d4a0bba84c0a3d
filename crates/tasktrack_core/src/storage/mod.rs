//! Key-value persistence seam between the domain store and host storage.
//!
//! # Responsibility
//! - Define the `KeyValueStore` contract for named text blobs.
//! - Name the fixed per-collection keys.
//!
//! # Invariants
//! - `read_raw` reports "not found" as `Ok(None)`, never as an error.
//! - Write failures are returned to the caller, never panicked.
//! - One key per top-level collection; keys never collide.

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Fixed logical key for one persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorageKey {
    Tasks,
    Projects,
    Notifications,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [Self::Tasks, Self::Projects, Self::Notifications];

    /// Stable key name used by every backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Projects => "projects",
            Self::Notifications => "notifications",
        }
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage adapter failure.
#[derive(Debug)]
pub enum StorageError {
    /// Storage is disabled or could not be opened.
    Unavailable(String),
    /// Writing would exceed the backend capacity.
    QuotaExceeded { key: StorageKey, needed: usize, limit: usize },
    Db(DbError),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::QuotaExceeded { key, needed, limit } => write!(
                f,
                "storage quota exceeded writing `{key}`: {needed} bytes over limit {limit}"
            ),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable storage for named text blobs.
pub trait KeyValueStore {
    /// Reads one blob; absent keys yield `Ok(None)`.
    fn read_raw(&self, key: StorageKey) -> StorageResult<Option<String>>;

    /// Replaces one blob.
    fn write_raw(&self, key: StorageKey, text: &str) -> StorageResult<()>;

    /// Replaces several blobs.
    ///
    /// The default writes sequentially and stops at the first failure, so
    /// earlier entries may already be stored. Backends with transactions
    /// override this to commit all entries or none.
    fn write_batch(&self, entries: &[(StorageKey, &str)]) -> StorageResult<()> {
        for (key, text) in entries {
            self.write_raw(*key, text)?;
        }
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn read_raw(&self, key: StorageKey) -> StorageResult<Option<String>> {
        (**self).read_raw(key)
    }

    fn write_raw(&self, key: StorageKey, text: &str) -> StorageResult<()> {
        (**self).write_raw(key, text)
    }

    fn write_batch(&self, entries: &[(StorageKey, &str)]) -> StorageResult<()> {
        (**self).write_batch(entries)
    }
}
