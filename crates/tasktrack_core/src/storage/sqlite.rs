//! SQLite-backed key-value adapter.
//!
//! # Responsibility
//! - Persist collection blobs in the `kv_entries` table.
//! - Commit paired writes in a single transaction.
//!
//! # Invariants
//! - The wrapped connection has migrations applied (`db::open_db*`).
//! - A batch either fully commits or leaves every key untouched.

use super::{KeyValueStore, StorageKey, StorageResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const UPSERT_SQL: &str = "INSERT INTO kv_entries (key, value, updated_at)
     VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
     ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at;";

/// Key-value adapter over one SQLite connection.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Wraps a connection that already has migrations applied.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens (and migrates) a private in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn read_raw(&self, key: StorageKey) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_raw(&self, key: StorageKey, text: &str) -> StorageResult<()> {
        self.conn.execute(UPSERT_SQL, params![key.as_str(), text])?;
        Ok(())
    }

    fn write_batch(&self, entries: &[(StorageKey, &str)]) -> StorageResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, text) in entries {
            tx.execute(UPSERT_SQL, params![key.as_str(), text])?;
        }
        tx.commit()?;
        Ok(())
    }
}
