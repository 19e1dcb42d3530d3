//! Persisted client state: the session credential and small preferences.
//!
//! Both the secure credential store and the general key-value store of the
//! device are modelled by one `KeyValueStore` trait. `MemoryStore` backs
//! tests and ephemeral sessions; `FileStore` keeps a JSON object on disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use tracing::warn;

use crate::error::StorageError;

/// Secure-storage key for the bearer token.
pub const TOKEN_KEY: &str = "userToken";
/// Secure-storage key for the signed-in user's numeric id.
pub const USER_ID_KEY: &str = "userId";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// A JSON object file; every write rewrites the whole file via a temp file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let store = Self {
            path,
            lock: Mutex::new(()),
        };
        // Surface a corrupt file at open time rather than on first read.
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(entries).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("tmp");
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        fs::write(&tmp, raw).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.load()?;
        f(&mut entries);
        self.save(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// Session credential held in secure storage.
///
/// Written only at sign-in and sign-out; read before every request.
#[derive(Clone)]
pub struct Credentials {
    store: Arc<dyn KeyValueStore>,
}

impl Credentials {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn token(&self) -> Result<Option<String>, StorageError> {
        Ok(self.store.get(TOKEN_KEY)?.filter(|t| !t.is_empty()))
    }

    pub fn user_id(&self) -> Result<Option<u64>, StorageError> {
        match self.store.get(USER_ID_KEY)? {
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|e: std::num::ParseIntError| StorageError::Malformed {
                    key: USER_ID_KEY.to_string(),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Store the token and user id together. When either write fails both
    /// keys are removed, so a failed save never leaves a usable token.
    pub fn save_session(&self, token: &str, user_id: u64) -> Result<(), StorageError> {
        let saved = self
            .store
            .set(USER_ID_KEY, &user_id.to_string())
            .and_then(|()| self.store.set(TOKEN_KEY, token));
        if let Err(err) = saved {
            if let Err(cleanup) = self.clear() {
                warn!(error = %cleanup, "failed to discard partial session");
            }
            return Err(err);
        }
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_ID_KEY)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").finish_non_exhaustive()
    }
}

/// Memory store whose writes to one key always fail.
#[cfg(test)]
pub(crate) struct FailingStore {
    inner: MemoryStore,
    fail_key: &'static str,
}

#[cfg(test)]
impl FailingStore {
    pub(crate) fn new(fail_key: &'static str) -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_key,
        }
    }
}

#[cfg(test)]
impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == self.fail_key {
            return Err(StorageError::Poisoned);
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/secure.json");
        {
            let store = FileStore::open(&path).unwrap();
            store.set(TOKEN_KEY, "abc").unwrap();
        }
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();
        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn credentials_round_trip_and_clear() {
        let creds = Credentials::in_memory();
        assert_eq!(creds.token().unwrap(), None);
        creds.save_session("mock-token-12345", 1).unwrap();
        assert_eq!(creds.token().unwrap().as_deref(), Some("mock-token-12345"));
        assert_eq!(creds.user_id().unwrap(), Some(1));
        creds.clear().unwrap();
        assert_eq!(creds.token().unwrap(), None);
        assert_eq!(creds.user_id().unwrap(), None);
    }

    #[test]
    fn failed_save_leaves_no_session() {
        for fail_key in [USER_ID_KEY, TOKEN_KEY] {
            let store = Arc::new(FailingStore::new(fail_key));
            store.inner.set(TOKEN_KEY, "stale").unwrap();
            let creds = Credentials::new(store);
            assert!(creds.save_session("fresh", 1).is_err());
            assert_eq!(creds.token().unwrap(), None, "{fail_key}");
            assert_eq!(creds.user_id().unwrap(), None, "{fail_key}");
        }
    }

    #[test]
    fn malformed_user_id_is_an_error() {
        let store = Arc::new(MemoryStore::new());
        store.set(USER_ID_KEY, "abc").unwrap();
        let creds = Credentials::new(store);
        assert!(matches!(creds.user_id(), Err(StorageError::Malformed { .. })));
    }
}
