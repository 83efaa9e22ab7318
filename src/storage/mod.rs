//! Persistent storage
//!
//! One sled database holds everything durable: a TTL cache of upstream
//! payloads and the dashboard settings. Each concern gets its own named tree
//! so iteration and clearing never cross over.

mod cache;
mod settings;

pub use cache::{CacheStats, CacheStore, Cached};
pub use settings::{Settings, SettingsStore};

use std::path::Path;
use std::sync::Arc;

use tracing::info;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Handle to the application database. Cheap to clone; trees share the
/// underlying sled instance.
#[derive(Clone)]
pub struct Store {
    db: Arc<sled::Db>,
}

impl Store {
    /// Open or create the database at the given directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path_ref = path.as_ref();
        let db = sled::open(path_ref)?;
        info!(path = %path_ref.display(), "Storage opened");
        Ok(Self { db: Arc::new(db) })
    }

    /// The TTL cache tree for upstream payloads.
    pub fn cache(&self) -> Result<CacheStore, StorageError> {
        Ok(CacheStore::new(self.db.open_tree("cache")?))
    }

    /// The settings tree (region, units, thresholds).
    pub fn settings(&self) -> Result<SettingsStore, StorageError> {
        Ok(SettingsStore::new(self.db.open_tree("settings")?))
    }

    /// Bytes on disk, for the status endpoint.
    pub fn size_on_disk(&self) -> u64 {
        self.db.size_on_disk().unwrap_or(0)
    }

    /// Flush outstanding writes. Called on shutdown; during normal operation
    /// sled's background flushing is durable enough for regenerable data.
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        assert!(store.cache().is_ok());
        assert!(store.settings().is_ok());
    }

    #[test]
    fn test_trees_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();

        let cache = store.cache().unwrap();
        cache
            .put("weather:gom", &serde_json::json!({"ok": true}), chrono::Duration::minutes(5))
            .unwrap();

        // Clearing the cache must not touch settings
        let settings = store.settings().unwrap();
        settings.set_region("brazil").unwrap();
        cache.clear().unwrap();

        assert_eq!(settings.load().region, "brazil");
    }

    #[test]
    fn test_reopen_preserves_data() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = Store::open(dir.path()).unwrap();
            store.settings().unwrap().set_region("australia").unwrap();
            store.flush().unwrap();
        }
        let store = Store::open(dir.path()).unwrap();
        assert_eq!(store.settings().unwrap().load().region, "australia");
    }
}
