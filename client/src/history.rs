//! Recent search terms, most recent first.

use std::sync::Arc;

use crate::error::StorageError;
use crate::storage::KeyValueStore;

pub const HISTORY_KEY: &str = "recentSearches";
pub const HISTORY_LIMIT: usize = 10;

#[derive(Clone)]
pub struct SearchHistory {
    store: Arc<dyn KeyValueStore>,
}

impl SearchHistory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn entries(&self) -> Result<Vec<String>, StorageError> {
        match self.store.get(HISTORY_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StorageError::Malformed {
                key: HISTORY_KEY.to_string(),
                reason: e.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Move `term` to the front, dropping any older copy and the overflow.
    pub fn record(&self, term: &str) -> Result<Vec<String>, StorageError> {
        let mut entries = self.entries()?;
        entries.retain(|e| e != term);
        entries.insert(0, term.to_string());
        entries.truncate(HISTORY_LIMIT);
        self.save(&entries)?;
        Ok(entries)
    }

    pub fn remove(&self, term: &str) -> Result<Vec<String>, StorageError> {
        let mut entries = self.entries()?;
        entries.retain(|e| e != term);
        self.save(&entries)?;
        Ok(entries)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(HISTORY_KEY)
    }

    fn save(&self, entries: &[String]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(entries).map_err(|e| StorageError::Malformed {
            key: HISTORY_KEY.to_string(),
            reason: e.to_string(),
        })?;
        self.store.set(HISTORY_KEY, &raw)
    }
}
