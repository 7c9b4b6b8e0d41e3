#![forbid(unsafe_code)]

//! Key/value storage seam (browser `localStorage` in production).
//!
//! Callers treat storage as best-effort: a failed read or write is logged
//! and otherwise ignored.

use std::collections::HashMap;

use thiserror::Error;

/// Storage access failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Storage is disabled or inaccessible (private mode, sandboxed frame).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// The write exceeded the storage quota.
    #[error("storage quota exceeded")]
    QuotaExceeded,
}

/// String-to-string storage, mirroring the Web Storage API.
pub trait KeyValueStorage {
    /// Read the value stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage for tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    fail_writes: bool,
    fail_reads: bool,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read fail with [`StorageError::Unavailable`].
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Make every subsequent write fail with [`StorageError::QuotaExceeded`].
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Unavailable("reads disabled".to_string()));
        }
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::QuotaExceeded);
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::QuotaExceeded);
        }
        self.items.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let mut storage = MemoryStorage::new();
        storage.set_item("k", "v").unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("v"));
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn injected_failures() {
        let mut storage = MemoryStorage::new();
        storage.fail_writes(true);
        assert_eq!(storage.set_item("k", "v"), Err(StorageError::QuotaExceeded));
        storage.fail_reads(true);
        assert!(storage.get_item("k").is_err());
        assert!(storage.is_empty());
    }
}
