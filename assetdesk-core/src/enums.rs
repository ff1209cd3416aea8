//! Enum types for AssetDesk entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ASSET STATUS
// ============================================================================

/// Lifecycle status of a physical asset.
///
/// `Disposed` is the soft-deleted state: the record still exists server-side
/// and can be restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetStatus {
    Active,
    Damaged,
    Disposed,
    #[serde(rename = "In Use")]
    InUse,
}

impl AssetStatus {
    pub fn all() -> &'static [AssetStatus] {
        &[
            AssetStatus::Active,
            AssetStatus::InUse,
            AssetStatus::Damaged,
            AssetStatus::Disposed,
        ]
    }

    /// Wire representation used by the REST API.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            AssetStatus::Active => "Active",
            AssetStatus::Damaged => "Damaged",
            AssetStatus::Disposed => "Disposed",
            AssetStatus::InUse => "In Use",
        }
    }

    pub fn from_wire_str(s: &str) -> Result<Self, EnumParseError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(AssetStatus::Active),
            "damaged" => Ok(AssetStatus::Damaged),
            "disposed" => Ok(AssetStatus::Disposed),
            "in use" | "in_use" | "inuse" => Ok(AssetStatus::InUse),
            _ => Err(EnumParseError::new("asset status", s)),
        }
    }

    pub fn is_disposed(&self) -> bool {
        matches!(self, AssetStatus::Disposed)
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire_str())
    }
}

impl FromStr for AssetStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire_str(s)
    }
}

// ============================================================================
// TRANSFER STATUS
// ============================================================================

/// Approval state of a branch-to-branch transfer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStatus {
    Pending,
    Approved,
    Rejected,
}

impl TransferStatus {
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "PENDING",
            TransferStatus::Approved => "APPROVED",
            TransferStatus::Rejected => "REJECTED",
        }
    }

    /// Whether an administrator can still approve or reject the request.
    pub fn is_actionable(&self) -> bool {
        matches!(self, TransferStatus::Pending)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire_str())
    }
}

impl FromStr for TransferStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(TransferStatus::Pending),
            "APPROVED" => Ok(TransferStatus::Approved),
            "REJECTED" => Ok(TransferStatus::Rejected),
            _ => Err(EnumParseError::new("transfer status", s)),
        }
    }
}

/// Decision an administrator can record on a pending transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferDecision {
    Approved,
    Rejected,
}

impl TransferDecision {
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            TransferDecision::Approved => "APPROVED",
            TransferDecision::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for TransferDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire_str())
    }
}

// ============================================================================
// USER ROLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    BranchManager,
    Staff,
}

impl UserRole {
    pub fn all() -> &'static [UserRole] {
        &[
            UserRole::SuperAdmin,
            UserRole::Admin,
            UserRole::BranchManager,
            UserRole::Staff,
        ]
    }

    pub fn as_wire_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "SUPER_ADMIN",
            UserRole::Admin => "ADMIN",
            UserRole::BranchManager => "BRANCH_MANAGER",
            UserRole::Staff => "STAFF",
        }
    }

    /// Only super administrators manage user accounts.
    pub fn can_manage_users(&self) -> bool {
        matches!(self, UserRole::SuperAdmin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire_str())
    }
}

impl FromStr for UserRole {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUPER_ADMIN" => Ok(UserRole::SuperAdmin),
            "ADMIN" => Ok(UserRole::Admin),
            "BRANCH_MANAGER" => Ok(UserRole::BranchManager),
            "STAFF" => Ok(UserRole::Staff),
            _ => Err(EnumParseError::new("user role", s)),
        }
    }
}

// ============================================================================
// HISTORY ACTION
// ============================================================================

/// Audit trail action recorded against an asset.
///
/// The server may introduce new actions; unknown values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HistoryAction {
    Created,
    Updated,
    Disposed,
    Restored,
    Transferred,
    Other(String),
}

impl HistoryAction {
    pub fn as_wire_str(&self) -> &str {
        match self {
            HistoryAction::Created => "CREATED",
            HistoryAction::Updated => "UPDATED",
            HistoryAction::Disposed => "DISPOSED",
            HistoryAction::Restored => "RESTORED",
            HistoryAction::Transferred => "TRANSFERRED",
            HistoryAction::Other(raw) => raw.as_str(),
        }
    }

    pub fn from_wire_str(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREATED" => HistoryAction::Created,
            "UPDATED" => HistoryAction::Updated,
            "DISPOSED" => HistoryAction::Disposed,
            "RESTORED" => HistoryAction::Restored,
            "TRANSFERRED" => HistoryAction::Transferred,
            _ => HistoryAction::Other(s.to_string()),
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

impl Serialize for HistoryAction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire_str())
    }
}

impl<'de> Deserialize<'de> for HistoryAction {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(HistoryAction::from_wire_str(&raw))
    }
}

// ============================================================================
// PARSE ERROR
// ============================================================================

/// Error when parsing an enum from its string form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind}: {value}")]
pub struct EnumParseError {
    pub kind: &'static str,
    pub value: String,
}

impl EnumParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_status_uses_spaced_wire_name() {
        let json = serde_json::to_string(&AssetStatus::InUse).unwrap();
        assert_eq!(json, "\"In Use\"");
        let parsed: AssetStatus = serde_json::from_str("\"In Use\"").unwrap();
        assert_eq!(parsed, AssetStatus::InUse);
    }

    #[test]
    fn asset_status_parse_is_case_insensitive() {
        assert_eq!("disposed".parse::<AssetStatus>().unwrap(), AssetStatus::Disposed);
        assert!("lost".parse::<AssetStatus>().is_err());
    }

    #[test]
    fn transfer_status_wire_format() {
        let parsed: TransferStatus = serde_json::from_str("\"APPROVED\"").unwrap();
        assert_eq!(parsed, TransferStatus::Approved);
        assert!(TransferStatus::Pending.is_actionable());
        assert!(!TransferStatus::Rejected.is_actionable());
    }

    #[test]
    fn user_role_round_trips_through_display() {
        for role in UserRole::all() {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), *role);
        }
        assert!(UserRole::SuperAdmin.can_manage_users());
        assert!(!UserRole::Admin.can_manage_users());
    }

    #[test]
    fn unknown_history_action_is_preserved() {
        let action: HistoryAction = serde_json::from_str("\"AUDITED\"").unwrap();
        assert_eq!(action, HistoryAction::Other("AUDITED".to_string()));
        assert_eq!(serde_json::to_string(&action).unwrap(), "\"AUDITED\"");
    }
}
