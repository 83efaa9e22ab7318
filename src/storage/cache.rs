//! TTL cache over a sled tree
//!
//! Every upstream payload (forecasts, storm advisories, earthquake feeds,
//! buoy observations) is cached with a per-source lifetime so the dashboard
//! survives restarts without hammering the APIs. Keys are caller-constructed
//! strings like `weather:27.50,-90.50`; values are JSON envelopes carrying
//! fetch and expiry timestamps alongside the payload.
//!
//! `get` only returns fresh entries. Expired entries stay on disk until the
//! background sweeper removes them, so a `get` right after expiry is cheap.

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::StorageError;

/// On-disk envelope for a cached payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    fetched_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    payload: serde_json::Value,
}

/// A fresh cache hit, with the timestamps callers surface in API responses.
#[derive(Debug, Clone)]
pub struct Cached<T> {
    pub value: T,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Aggregate counters for the status endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub expired: usize,
    pub approx_bytes: usize,
}

/// TTL cache backed by a named sled tree.
#[derive(Clone)]
pub struct CacheStore {
    tree: sled::Tree,
}

impl CacheStore {
    pub(super) fn new(tree: sled::Tree) -> Self {
        Self { tree }
    }

    /// Look up a fresh entry. Returns `None` for missing, expired, or
    /// unreadable entries — a cache miss is never an error.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<Cached<T>> {
        let bytes = match self.tree.get(key.as_bytes()) {
            Ok(Some(b)) => b,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_slice(&bytes) {
            Ok(e) => e,
            Err(e) => {
                warn!(key = %key, error = %e, "Corrupt cache entry, ignoring");
                return None;
            }
        };

        if entry.expires_at <= Utc::now() {
            debug!(key = %key, expired_at = %entry.expires_at, "Cache entry expired");
            return None;
        }

        match serde_json::from_value(entry.payload) {
            Ok(value) => Some(Cached {
                value,
                fetched_at: entry.fetched_at,
                expires_at: entry.expires_at,
            }),
            Err(e) => {
                warn!(key = %key, error = %e, "Cache payload shape mismatch, ignoring");
                None
            }
        }
    }

    /// Store a payload with the given lifetime. Overwrites any prior entry.
    pub fn put<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<(), StorageError> {
        let now = Utc::now();
        let entry = CacheEntry {
            fetched_at: now,
            expires_at: now + ttl,
            payload: serde_json::to_value(value)?,
        };
        let bytes = serde_json::to_vec(&entry)?;
        self.tree.insert(key.as_bytes(), bytes)?;
        debug!(key = %key, ttl_minutes = ttl.num_minutes(), "Cache entry stored");
        Ok(())
    }

    /// Remove a single entry (e.g. to force a refetch).
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.tree.remove(key.as_bytes())?;
        Ok(())
    }

    /// Drop everything. Returns the number of entries removed.
    pub fn clear(&self) -> Result<usize, StorageError> {
        let n = self.tree.len();
        self.tree.clear()?;
        Ok(n)
    }

    /// Delete all expired entries. Unreadable entries are deleted too —
    /// they can never be served, only re-fetched.
    pub fn sweep_expired(&self) -> Result<usize, StorageError> {
        let now = Utc::now();
        let mut stale_keys = Vec::new();

        for item in self.tree.iter() {
            let (key, value) = item?;
            match serde_json::from_slice::<CacheEntry>(&value) {
                Ok(entry) if entry.expires_at <= now => stale_keys.push(key.to_vec()),
                Ok(_) => {}
                Err(_) => stale_keys.push(key.to_vec()),
            }
        }

        let removed = stale_keys.len();
        for key in stale_keys {
            self.tree.remove(key)?;
        }

        if removed > 0 {
            debug!(removed, "Swept expired cache entries");
        }
        Ok(removed)
    }

    /// Counters for the status endpoint. Entries that fail to parse are
    /// counted as expired since the sweeper will remove them.
    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let mut entries = 0;
        let mut expired = 0;
        let mut approx_bytes = 0;

        for item in self.tree.iter().flatten() {
            let (key, value) = item;
            entries += 1;
            approx_bytes += key.len() + value.len();
            match serde_json::from_slice::<CacheEntry>(&value) {
                Ok(entry) if entry.expires_at <= now => expired += 1,
                Ok(_) => {}
                Err(_) => expired += 1,
            }
        }

        CacheStats {
            entries,
            expired,
            approx_bytes,
        }
    }
}
