//! In-memory key-value adapter.
//!
//! Used for tests and ephemeral sessions. Supports a byte quota and an
//! availability switch so callers can exercise write-failure paths.

use super::{KeyValueStore, StorageError, StorageKey, StorageResult};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<BTreeMap<StorageKey, String>>,
    quota_bytes: Option<usize>,
    disabled: Cell<bool>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the total stored bytes across all keys.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Seeds one blob, bypassing quota and availability checks.
    pub fn insert(&self, key: StorageKey, text: impl Into<String>) {
        self.entries.borrow_mut().insert(key, text.into());
    }

    /// Returns a copy of one stored blob.
    pub fn get(&self, key: StorageKey) -> Option<String> {
        self.entries.borrow().get(&key).cloned()
    }

    /// Simulates disabled storage: every write fails until re-enabled.
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    fn check_quota(&self, key: StorageKey, text: &str) -> StorageResult<()> {
        let Some(limit) = self.quota_bytes else {
            return Ok(());
        };
        let others: usize = self
            .entries
            .borrow()
            .iter()
            .filter(|(existing, _)| **existing != key)
            .map(|(_, value)| value.len())
            .sum();
        let needed = others + text.len();
        if needed > limit {
            return Err(StorageError::QuotaExceeded { key, needed, limit });
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn read_raw(&self, key: StorageKey) -> StorageResult<Option<String>> {
        Ok(self.get(key))
    }

    fn write_raw(&self, key: StorageKey, text: &str) -> StorageResult<()> {
        if self.disabled.get() {
            return Err(StorageError::Unavailable("storage disabled".to_string()));
        }
        self.check_quota(key, text)?;
        self.entries.borrow_mut().insert(key, text.to_string());
        Ok(())
    }
}
