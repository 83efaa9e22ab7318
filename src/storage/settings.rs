//! Settings persistence
//!
//! Stores dashboard settings in a named sled tree ("settings"): the active
//! region, unit preferences, and the operation threshold registry. Each
//! setting lives under its own key so one corrupt value degrades to its
//! default without dragging the others down.
//!
//! Thresholds are stored as a full registry snapshot. On load, stored
//! categories win wholesale and missing categories fall back to the shipped
//! defaults, so saves made before a new operation type shipped still pick up
//! its default limits.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::StorageError;
use crate::regions;
use crate::types::{Thresholds, ThresholdsPatch};
use crate::units::{UnitPreferences, UnitsPatch};

const KEY_REGION: &str = "region";
const KEY_UNITS: &str = "units";
const KEY_THRESHOLDS: &str = "thresholds";

/// Everything the dashboard persists across restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub region: String,
    pub units: UnitPreferences,
    pub thresholds: Thresholds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            region: regions::DEFAULT_REGION_ID.to_string(),
            units: UnitPreferences::default(),
            thresholds: Thresholds::defaults(),
        }
    }
}

/// Settings store backed by a named sled tree.
#[derive(Clone)]
pub struct SettingsStore {
    tree: sled::Tree,
}

impl SettingsStore {
    pub(super) fn new(tree: sled::Tree) -> Self {
        Self { tree }
    }

    /// Load the full settings document. Missing or unreadable values fall
    /// back to their defaults — loading never fails.
    pub fn load(&self) -> Settings {
        let region = match self.get_json::<String>(KEY_REGION) {
            Some(id) if regions::region(&id).is_some() => id,
            Some(id) => {
                warn!(region = %id, "Stored region is unknown, using default");
                regions::DEFAULT_REGION_ID.to_string()
            }
            None => regions::DEFAULT_REGION_ID.to_string(),
        };

        let units = self.get_json::<UnitPreferences>(KEY_UNITS).unwrap_or_default();

        let thresholds = self
            .get_json::<Thresholds>(KEY_THRESHOLDS)
            .map(merge_over_defaults)
            .unwrap_or_else(Thresholds::defaults);

        Settings {
            region,
            units,
            thresholds,
        }
    }

    /// Persist a new active region. The caller validates the id.
    pub fn set_region(&self, region: &str) -> Result<Settings, StorageError> {
        self.put_json(KEY_REGION, &region.to_string())?;
        Ok(self.load())
    }

    /// Write the configured startup region, but only when no region has
    /// ever been stored — a region chosen at runtime outlives restarts.
    pub fn seed_region(&self, region: &str) -> Result<(), StorageError> {
        if !self.tree.contains_key(KEY_REGION.as_bytes())? {
            self.put_json(KEY_REGION, &region.to_string())?;
        }
        Ok(())
    }

    /// Apply a partial unit-preference update and persist the result.
    pub fn set_units(&self, patch: UnitsPatch) -> Result<Settings, StorageError> {
        let mut units = self.get_json::<UnitPreferences>(KEY_UNITS).unwrap_or_default();
        units.apply(patch);
        self.put_json(KEY_UNITS, &units)?;
        Ok(self.load())
    }

    /// Merge a threshold patch into the stored registry and persist it.
    /// Returns the full post-merge registry.
    pub fn apply_thresholds_patch(&self, patch: ThresholdsPatch) -> Result<Thresholds, StorageError> {
        let mut thresholds = self
            .get_json::<Thresholds>(KEY_THRESHOLDS)
            .map(merge_over_defaults)
            .unwrap_or_else(Thresholds::defaults);
        thresholds.apply_patch(patch);
        self.put_json(KEY_THRESHOLDS, &thresholds)?;
        Ok(thresholds)
    }

    /// Discard all stored threshold edits and return the shipped defaults.
    pub fn reset_thresholds(&self) -> Result<Thresholds, StorageError> {
        let defaults = Thresholds::defaults();
        self.put_json(KEY_THRESHOLDS, &defaults)?;
        Ok(defaults)
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.tree.get(key.as_bytes()) {
            Ok(Some(b)) => b,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %key, error = %e, "Settings read failed");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(key = %key, error = %e, "Corrupt setting, using default");
                None
            }
        }
    }

    fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value)?;
        self.tree.insert(key.as_bytes(), bytes)?;
        Ok(())
    }
}

/// Stored categories win wholesale; categories absent from the stored
/// snapshot pick up the shipped defaults.
fn merge_over_defaults(stored: Thresholds) -> Thresholds {
    let defaults = Thresholds::defaults();
    Thresholds {
        helicopter_ops: stored.helicopter_ops.or(defaults.helicopter_ops),
        crane_lift: stored.crane_lift.or(defaults.crane_lift),
        diving_ops: stored.diving_ops.or(defaults.diving_ops),
        rig_move: stored.rig_move.or(defaults.rig_move),
        personnel_transfer: stored.personnel_transfer.or(defaults.personnel_transfer),
    }
}
