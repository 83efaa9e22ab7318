//! Operation limit sets and the threshold registry

use serde::{Deserialize, Serialize};

use super::OperationType;

// ============================================================================
// Limit Set
// ============================================================================

/// Named numeric bounds for one operation type.
///
/// An absent bound means "this dimension is not checked" — never "zero
/// tolerance". Wind bounds are knots, wave bounds meters, visibility
/// kilometers, ceiling meters, current knots.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct LimitSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wind_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wind_gusts: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wave_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_visibility: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ceiling: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_current_speed: Option<f64>,
    /// Minimum useful window duration for planning purposes.
    ///
    /// Informational only: the segmentation engine emits every maximal safe
    /// run regardless of this value; filtering short windows is a display
    /// decision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_window_hours: Option<u32>,
}

/// Limit sets for the two personnel-transfer methods, stored as one
/// configuration category with `boat` and `w2w` sub-keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PersonnelTransferLimits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boat: Option<LimitSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w2w: Option<LimitSet>,
}

// ============================================================================
// Threshold Registry
// ============================================================================

/// Per-operation limit sets, user-editable and persisted with settings.
///
/// Evaluation treats the registry as read-only input per call; it is never
/// consulted through ambient state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Thresholds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helicopter_ops: Option<LimitSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crane_lift: Option<LimitSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diving_ops: Option<LimitSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rig_move: Option<LimitSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personnel_transfer: Option<PersonnelTransferLimits>,
}

impl Thresholds {
    /// Look up the limit set for an operation; `None` when the registry has
    /// nothing configured for it. Field-level absence inside the returned
    /// set is preserved as-is — defaults are applied by the settings layer,
    /// never here.
    pub fn limits_for(&self, op: OperationType) -> Option<&LimitSet> {
        match op {
            OperationType::HelicopterOps => self.helicopter_ops.as_ref(),
            OperationType::CraneLift => self.crane_lift.as_ref(),
            OperationType::DivingOps => self.diving_ops.as_ref(),
            OperationType::RigMove => self.rig_move.as_ref(),
            OperationType::PersonnelTransferBoat => {
                self.personnel_transfer.as_ref().and_then(|pt| pt.boat.as_ref())
            }
            OperationType::PersonnelTransferW2W => {
                self.personnel_transfer.as_ref().and_then(|pt| pt.w2w.as_ref())
            }
        }
    }

    /// Factory defaults used when no stored settings exist.
    pub fn defaults() -> Self {
        Self {
            helicopter_ops: Some(LimitSet {
                max_wind_speed: Some(35.0),
                max_wind_gusts: Some(45.0),
                max_wave_height: Some(2.4),
                min_visibility: Some(4.8),
                min_ceiling: Some(305.0),
                ..LimitSet::default()
            }),
            crane_lift: Some(LimitSet {
                max_wind_speed: Some(20.0),
                max_wave_height: Some(1.8),
                ..LimitSet::default()
            }),
            diving_ops: Some(LimitSet {
                max_wave_height: Some(2.5),
                max_current_speed: Some(1.5),
                max_wind_speed: Some(21.0),
                ..LimitSet::default()
            }),
            rig_move: Some(LimitSet {
                max_wind_speed: Some(15.0),
                max_wave_height: Some(1.2),
                min_window_hours: Some(12),
                ..LimitSet::default()
            }),
            personnel_transfer: Some(PersonnelTransferLimits {
                boat: Some(LimitSet {
                    max_wave_height: Some(2.0),
                    max_wind_speed: Some(25.0),
                    ..LimitSet::default()
                }),
                w2w: Some(LimitSet {
                    max_wave_height: Some(3.0),
                    max_wind_speed: Some(38.0),
                    ..LimitSet::default()
                }),
            }),
        }
    }

    /// Merge a partial update into the registry.
    ///
    /// Shallow per category: fields present in the patch overwrite, absent
    /// fields keep their current values. Personnel-transfer patches apply
    /// to the addressed sub-key only, never the sibling.
    pub fn apply_patch(&mut self, patch: ThresholdsPatch) {
        if let Some(p) = patch.helicopter_ops {
            merge_limits(&mut self.helicopter_ops, p);
        }
        if let Some(p) = patch.crane_lift {
            merge_limits(&mut self.crane_lift, p);
        }
        if let Some(p) = patch.diving_ops {
            merge_limits(&mut self.diving_ops, p);
        }
        if let Some(p) = patch.rig_move {
            merge_limits(&mut self.rig_move, p);
        }
        if let Some(pt) = patch.personnel_transfer {
            let entry = self
                .personnel_transfer
                .get_or_insert_with(PersonnelTransferLimits::default);
            if let Some(p) = pt.boat {
                merge_limits(&mut entry.boat, p);
            }
            if let Some(p) = pt.w2w {
                merge_limits(&mut entry.w2w, p);
            }
        }
    }
}

fn merge_limits(slot: &mut Option<LimitSet>, patch: LimitSet) {
    let set = slot.get_or_insert_with(LimitSet::default);
    if patch.max_wind_speed.is_some() {
        set.max_wind_speed = patch.max_wind_speed;
    }
    if patch.max_wind_gusts.is_some() {
        set.max_wind_gusts = patch.max_wind_gusts;
    }
    if patch.max_wave_height.is_some() {
        set.max_wave_height = patch.max_wave_height;
    }
    if patch.min_visibility.is_some() {
        set.min_visibility = patch.min_visibility;
    }
    if patch.min_ceiling.is_some() {
        set.min_ceiling = patch.min_ceiling;
    }
    if patch.max_current_speed.is_some() {
        set.max_current_speed = patch.max_current_speed;
    }
    if patch.min_window_hours.is_some() {
        set.min_window_hours = patch.min_window_hours;
    }
}

/// Partial registry update, deserialized from PATCH bodies. Each category
/// is itself a partial [`LimitSet`]: only the fields present take effect.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThresholdsPatch {
    pub helicopter_ops: Option<LimitSet>,
    pub crane_lift: Option<LimitSet>,
    pub diving_ops: Option<LimitSet>,
    pub rig_move: Option<LimitSet>,
    pub personnel_transfer: Option<PersonnelTransferPatch>,
}

/// Partial update for the nested personnel-transfer category.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonnelTransferPatch {
    pub boat: Option<LimitSet>,
    pub w2w: Option<LimitSet>,
}
