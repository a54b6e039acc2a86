//! Local persistence.
//!
//! Every feature loads its initial state through [`PersistentStore`] and
//! writes back on every mutation. The store is best-effort: a failed read is
//! reported as "nothing stored", and the first failed write flips the store
//! into an in-memory shadow for the remainder of the session.

mod config;
pub mod database;

pub use config::{Config, LoggingConfig, NotificationsConfig, StorageConfig};
pub use database::Database;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ConfigError, StoreError};

/// Returns the data directory, creating it if needed.
///
/// `TASKIFY_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/taskify[-dev]/`, with `TASKIFY_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("TASKIFY_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TASKIFY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("taskify-dev")
            } else {
                base_dir.join("taskify")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// A durable string key/value backend.
pub trait KvBackend: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Volatile backend. Used when no durable storage is wanted or available.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.map.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.map().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.map().remove(key);
        Ok(())
    }
}

struct StoreInner {
    backend: Box<dyn KvBackend>,
    /// Writes made after the backend failed. `None` marks a removal.
    shadow: HashMap<String, Option<String>>,
    degraded: bool,
}

/// Read-through, write-through wrapper over a [`KvBackend`].
///
/// Cloning is cheap; clones share the backend and the degraded flag.
#[derive(Clone)]
pub struct PersistentStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore")
            .field("degraded", &self.is_degraded())
            .finish_non_exhaustive()
    }
}

impl PersistentStore {
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                backend: Box::new(backend),
                shadow: HashMap::new(),
                degraded: false,
            })),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Open the SQLite store described by `config`, falling back to memory.
    ///
    /// Never fails: if the database cannot be opened the store starts out
    /// degraded and the session runs without durability.
    pub fn open(config: &StorageConfig) -> Self {
        if config.in_memory {
            return Self::in_memory();
        }
        let opened = data_dir()
            .map_err(|e| StoreError::StorageUnavailable(e.to_string()))
            .and_then(|dir| Database::open_at(dir.join(&config.database_file)));
        match opened {
            Ok(db) => Self::new(db),
            Err(e) => {
                tracing::warn!(error = %e, "persistent storage unavailable, running in memory");
                let store = Self::in_memory();
                store.lock().degraded = true;
                store
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// True once a write has failed and the store went memory-only.
    pub fn is_degraded(&self) -> bool {
        self.lock().degraded
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let inner = self.lock();
        if let Some(shadowed) = inner.shadow.get(key) {
            return shadowed.clone();
        }
        match inner.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "read failed, treating as absent");
                None
            }
        }
    }

    pub fn set(&self, key: &str, value: &str) {
        let mut inner = self.lock();
        if !inner.degraded {
            match inner.backend.set(key, value) {
                Ok(()) => return,
                Err(e) => {
                    tracing::warn!(key, error = %e, "write failed, continuing in memory only");
                    inner.degraded = true;
                }
            }
        }
        inner.shadow.insert(key.to_string(), Some(value.to_string()));
    }

    pub fn remove(&self, key: &str) {
        let mut inner = self.lock();
        if !inner.degraded {
            match inner.backend.remove(key) {
                Ok(()) => return,
                Err(e) => {
                    tracing::warn!(key, error = %e, "remove failed, continuing in memory only");
                    inner.degraded = true;
                }
            }
        }
        inner.shadow.insert(key.to_string(), None);
    }

    /// Load and decode a JSON value.
    ///
    /// # Errors
    /// Returns [`StoreError::MalformedPersistedState`] if a value is stored
    /// but does not decode as `T`.
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::MalformedPersistedState {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    /// Encode and store a JSON value. Best-effort.
    pub fn save_json<T: Serialize>(&self, key: &str, value: &T) {
        match encode_json(key, value) {
            Ok(json) => self.set(key, &json),
            Err(e) => tracing::warn!(error = %e, "value not persisted"),
        }
    }
}

fn encode_json<T: Serialize>(key: &str, value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Serialize {
        key: key.to_string(),
        message: e.to_string(),
    })
}
