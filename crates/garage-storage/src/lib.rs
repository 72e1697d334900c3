//! Garage Storage
//!
//! Record store backends for the garage vehicle catalog. Both implement
//! [`garage_core::RecordStore`]; pick one at startup with [`open_store`].
//!
//! - [`SqliteRecordStore`]: a database file, one connection per session
//! - [`MemoryRecordStore`]: a process-local table, used by tests and demos

pub mod memory;
pub mod sqlite;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use garage_core::{RecordStore, StorageError};

pub use memory::MemoryRecordStore;
pub use sqlite::{SqliteRecordStore, DEFAULT_BUSY_TIMEOUT_MS};

/// Which record store backend to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Memory,
}

/// Record store settings (`[store]` section of the server config)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Backend,
    /// Database file, used by the sqlite backend only
    pub path: PathBuf,
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Sqlite,
            path: PathBuf::from("garage.db"),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Open the configured record store
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>, StorageError> {
    let store: Arc<dyn RecordStore> = match config.backend {
        Backend::Sqlite => Arc::new(SqliteRecordStore::open_with_timeout(
            &config.path,
            config.busy_timeout_ms,
        )?),
        Backend::Memory => Arc::new(MemoryRecordStore::new()),
    };
    tracing::info!(backend = store.backend(), "record store opened");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.backend, Backend::Sqlite);
        assert_eq!(config.path, PathBuf::from("garage.db"));
        assert_eq!(config.busy_timeout_ms, 5_000);
    }

    #[test]
    fn test_open_memory_store() {
        let config = StoreConfig {
            backend: Backend::Memory,
            ..StoreConfig::default()
        };
        let store = open_store(&config).unwrap();
        assert_eq!(store.backend(), "memory");
    }

    #[test]
    fn test_open_sqlite_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            path: dir.path().join("catalog.db"),
            ..StoreConfig::default()
        };
        let store = open_store(&config).unwrap();
        assert_eq!(store.backend(), "sqlite");
        assert!(dir.path().join("catalog.db").exists());
    }
}
