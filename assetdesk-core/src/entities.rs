//! Entity and payload types exchanged with the AssetDesk REST API.
//!
//! All bodies are JSON with camelCase field names. Response types derive
//! both `Serialize` and `Deserialize` so fixtures can be produced from them.

use crate::enums::{AssetStatus, HistoryAction, TransferDecision, TransferStatus, UserRole};
use crate::identity::{AssetId, BranchId, HistoryId, Timestamp, TransferId, UserId};
use serde::{Deserialize, Serialize};

/// Branch the server names this way is shown apart from regional branches.
pub const HEAD_OFFICE_NAME: &str = "Head Office";

/// Categories offered by the asset forms and the category filter.
pub const KNOWN_CATEGORIES: &[&str] = &[
    "Furniture",
    "Computer",
    "Accessory",
    "Vehicle",
    "Jewellery Equipment",
    "Lab Equipment",
];

/// A `{ "name": ... }` relation embedded in a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

impl NamedRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

// ============================================================================
// ASSETS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: AssetId,
    /// Human-facing asset code, e.g. `FUR-0012`.
    #[serde(rename = "assetId")]
    pub asset_code: String,
    #[serde(rename = "assetCode", default, skip_serializing_if = "Option::is_none")]
    pub alt_code: Option<String>,
    pub name: String,
    pub category: String,
    pub status: AssetStatus,
    #[serde(default)]
    pub value: f64,
    pub branch_id: BranchId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_type: Option<NamedRef>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_page_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grn_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revaluation_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transferred_to_consumable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_section: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_of_survey_category: Option<SurveyCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_of_survey_year: Option<SurveyYear>,
    pub created_at: Timestamp,
}

fn default_quantity() -> u32 {
    1
}

impl Asset {
    /// Branch name if the server embedded the relation.
    pub fn branch_name(&self) -> Option<&str> {
        self.branch.as_ref().map(|b| b.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyYear {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub year: i32,
}

/// Board-of-survey reference data used by the asset edit form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterData {
    #[serde(default)]
    pub categories: Vec<SurveyCategory>,
    #[serde(default)]
    pub years: Vec<SurveyYear>,
}

/// Payload for `POST /assets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    #[serde(rename = "assetId")]
    pub asset_code: String,
    pub name: String,
    pub category: String,
    pub status: AssetStatus,
    pub value: f64,
    pub branch_id: BranchId,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_page_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grn_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revaluation_price: Option<f64>,
    pub transferred_to_consumable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_section: Option<String>,
}

impl NewAsset {
    /// Minimal payload with the form defaults (quantity 1, value 0, Active).
    pub fn new(
        asset_code: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        branch_id: BranchId,
    ) -> Self {
        Self {
            asset_code: asset_code.into(),
            name: name.into(),
            category: category.into(),
            status: AssetStatus::Active,
            value: 0.0,
            branch_id,
            quantity: 1,
            inventory_page_no: None,
            purchase_date: None,
            purchase_price: None,
            grn_number: None,
            remarks: None,
            revaluation_price: None,
            transferred_to_consumable: false,
            current_location: None,
            new_section: None,
        }
    }
}

/// Payload for `PUT /assets/:id`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AssetStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<BranchId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revaluation_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_of_survey_category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_of_survey_year_id: Option<i64>,
}

impl AssetUpdate {
    pub fn is_empty(&self) -> bool {
        self == &AssetUpdate::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisposeRequest {
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextCodeResponse {
    pub next_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetHistoryEntry {
    pub id: HistoryId,
    pub action: HistoryAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<NamedRef>,
    pub created_at: Timestamp,
}

// ============================================================================
// BRANCHES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    pub location: String,
    pub created_at: Timestamp,
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<BranchCounts>,
}

impl Branch {
    pub fn is_head_office(&self) -> bool {
        self.name == HEAD_OFFICE_NAME
    }

    pub fn staff_count(&self) -> u64 {
        self.counts.as_ref().map(|c| c.users).unwrap_or(0)
    }

    pub fn asset_count(&self) -> u64 {
        self.counts.as_ref().map(|c| c.assets).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchCounts {
    #[serde(default)]
    pub users: u64,
    #[serde(default)]
    pub assets: u64,
}

/// Payload for creating or updating a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchInput {
    pub name: String,
    pub location: String,
}

// ============================================================================
// TRANSFERS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub id: TransferId,
    pub asset_id: AssetId,
    pub from_branch_id: BranchId,
    pub to_branch_id: BranchId,
    pub status: TransferStatus,
    pub request_date: Timestamp,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub asset: TransferAssetRef,
    pub from_branch: NamedRef,
    pub to_branch: NamedRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferAssetRef {
    pub name: String,
    #[serde(rename = "assetId")]
    pub asset_code: String,
}

/// Payload for `POST /transfers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransfer {
    pub asset_id: AssetId,
    pub to_branch_id: BranchId,
    pub reason: String,
}

/// Payload for `PUT /transfers/:id/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferStatusUpdate {
    pub status: TransferDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

// ============================================================================
// USERS & AUTH
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<NamedRef>,
    pub created_at: Timestamp,
}

impl User {
    /// Users without a branch operate across all branches.
    pub fn branch_label(&self) -> &str {
        self.branch.as_ref().map(|b| b.name.as_str()).unwrap_or("Global")
    }
}

/// Payload for `POST /users`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<BranchId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub role: UserRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Credential plus identity returned by `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// DASHBOARD
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_assets: u64,
    #[serde(default)]
    pub pending_transfers: u64,
    #[serde(default)]
    pub total_branches: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charts: Option<DashboardCharts>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    #[serde(default)]
    pub assets_by_category: Vec<ChartPoint>,
    #[serde(default)]
    pub assets_by_status: Vec<ChartPoint>,
    #[serde(default)]
    pub assets_value_by_branch: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn asset_decodes_server_shape() {
        let body = json!({
            "id": 3,
            "assetId": "COM-0003",
            "name": "Laptop",
            "category": "Computer",
            "status": "In Use",
            "value": 250000.0,
            "branchId": 1,
            "branch": { "name": "Head Office" },
            "createdAt": "2024-05-01T08:30:00.000Z"
        });
        let asset: Asset = serde_json::from_value(body).unwrap();
        assert_eq!(asset.asset_code, "COM-0003");
        assert_eq!(asset.status, AssetStatus::InUse);
        assert_eq!(asset.quantity, 1);
        assert_eq!(asset.branch_name(), Some("Head Office"));
    }

    #[test]
    fn new_asset_omits_absent_optionals() {
        let payload = NewAsset::new("FUR-0001", "Desk", "Furniture", BranchId::from(2));
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["assetId"], "FUR-0001");
        assert_eq!(value["branchId"], 2);
        assert_eq!(value["transferredToConsumable"], false);
        assert!(value.get("purchasePrice").is_none());
    }

    #[test]
    fn branch_counts_default_to_zero() {
        let branch: Branch = serde_json::from_value(json!({
            "id": 1,
            "name": "Kandy",
            "location": "Kandy",
            "createdAt": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(branch.staff_count(), 0);
        assert_eq!(branch.asset_count(), 0);
        assert!(!branch.is_head_office());
    }

    #[test]
    fn transfer_status_update_serializes_decision() {
        let update = TransferStatusUpdate {
            status: TransferDecision::Rejected,
            remarks: None,
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "status": "REJECTED" }));
    }

    #[test]
    fn empty_asset_update_is_detected() {
        assert!(AssetUpdate::default().is_empty());
        let update = AssetUpdate {
            name: Some("Chair".into()),
            ..AssetUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
