//! Operation types and go/no-go status

use serde::{Deserialize, Serialize};

// ============================================================================
// Operation Type (closed enumeration)
// ============================================================================

/// Offshore activity category with its own safety thresholds.
///
/// The enumeration is closed: every threshold lookup and status summary
/// matches exhaustively over these six variants, so an unrecognized
/// operation key can only exist at the serialization boundary, never
/// inside the evaluation path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum OperationType {
    HelicopterOps,
    CraneLift,
    DivingOps,
    RigMove,
    PersonnelTransferBoat,
    PersonnelTransferW2W,
}

impl OperationType {
    /// All operations in their stable display/summary order.
    pub const ALL: [Self; 6] = [
        Self::HelicopterOps,
        Self::CraneLift,
        Self::DivingOps,
        Self::RigMove,
        Self::PersonnelTransferBoat,
        Self::PersonnelTransferW2W,
    ];

    /// Wire key used in API payloads and query parameters.
    pub fn key(self) -> &'static str {
        match self {
            Self::HelicopterOps => "helicopterOps",
            Self::CraneLift => "craneLift",
            Self::DivingOps => "divingOps",
            Self::RigMove => "rigMove",
            Self::PersonnelTransferBoat => "personnelTransferBoat",
            Self::PersonnelTransferW2W => "personnelTransferW2W",
        }
    }

    /// Parse a wire key; `None` for anything outside the enumeration.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "helicopterOps" => Some(Self::HelicopterOps),
            "craneLift" => Some(Self::CraneLift),
            "divingOps" => Some(Self::DivingOps),
            "rigMove" => Some(Self::RigMove),
            "personnelTransferBoat" => Some(Self::PersonnelTransferBoat),
            "personnelTransferW2W" => Some(Self::PersonnelTransferW2W),
            _ => None,
        }
    }

    /// Get display name for UI
    pub fn display_name(self) -> &'static str {
        match self {
            Self::HelicopterOps => "Helicopter Operations",
            Self::CraneLift => "Crane Lift",
            Self::DivingOps => "Diving Operations",
            Self::RigMove => "Rig Move",
            Self::PersonnelTransferBoat => "Personnel Transfer (Boat)",
            Self::PersonnelTransferW2W => "Personnel Transfer (W2W)",
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Go / No-Go Status
// ============================================================================

/// Safety verdict for one operation against current conditions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum GoStatus {
    Go,
    NoGo,
    #[default]
    Unknown,
}

impl std::fmt::Display for GoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoStatus::Go => write!(f, "go"),
            GoStatus::NoGo => write!(f, "no-go"),
            GoStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// One row of the current-conditions operations summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OperationStatus {
    pub key: OperationType,
    pub name: String,
    pub status: GoStatus,
}
