#![forbid(unsafe_code)]

//! Recently used block types.
//!
//! Most-recent-first, de-duplicated by name, capped. Persisted as a JSON
//! array of names through [`KeyValueStorage`]. Storage is best-effort: read
//! and write failures (and malformed stored data) are logged at `debug` and
//! otherwise ignored.

use bdock_core::config::SidebarConfig;
use bdock_core::storage::KeyValueStorage;

/// Recently used block names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentlyUsed {
    names: Vec<String>,
    limit: usize,
    storage_key: String,
}

impl RecentlyUsed {
    /// An empty list.
    #[must_use]
    pub fn new(limit: usize, storage_key: impl Into<String>) -> Self {
        Self {
            names: Vec::new(),
            limit,
            storage_key: storage_key.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &SidebarConfig) -> Self {
        Self::new(config.recent_limit, config.recent_storage_key.clone())
    }

    /// Load the persisted list, starting empty when storage is unavailable
    /// or holds something unreadable.
    pub fn load(&mut self, storage: &dyn KeyValueStorage) {
        let raw = match storage.get_item(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(err) => {
                tracing::debug!(target: "bdock.sidebar", key = %self.storage_key, error = %err, "recent list not loaded");
                return;
            }
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(stored) => {
                self.names.clear();
                for name in stored {
                    if !name.is_empty() && !self.names.contains(&name) {
                        self.names.push(name);
                    }
                }
                self.names.truncate(self.limit);
            }
            Err(err) => {
                tracing::debug!(target: "bdock.sidebar", key = %self.storage_key, error = %err, "recent list malformed");
            }
        }
    }

    /// Move `name` to the front and persist.
    pub fn record(&mut self, name: &str, storage: &mut dyn KeyValueStorage) {
        if name.is_empty() {
            return;
        }
        self.names.retain(|n| n != name);
        self.names.insert(0, name.to_string());
        self.names.truncate(self.limit);
        self.persist(storage);
    }

    /// Forget everything, including the persisted copy.
    pub fn clear(&mut self, storage: &mut dyn KeyValueStorage) {
        self.names.clear();
        if let Err(err) = storage.remove_item(&self.storage_key) {
            tracing::debug!(target: "bdock.sidebar", key = %self.storage_key, error = %err, "recent list not cleared");
        }
    }

    /// Names, most recent first.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    fn persist(&self, storage: &mut dyn KeyValueStorage) {
        let encoded = match serde_json::to_string(&self.names) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::debug!(target: "bdock.sidebar", error = %err, "recent list not encoded");
                return;
            }
        };
        if let Err(err) = storage.set_item(&self.storage_key, &encoded) {
            tracing::debug!(target: "bdock.sidebar", key = %self.storage_key, error = %err, "recent list not persisted");
        }
    }
}
