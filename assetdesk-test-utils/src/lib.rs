//! AssetDesk Test Utilities
//!
//! Shared test infrastructure for the AssetDesk workspace:
//! - Proptest generators for entity types
//! - Fixtures for common scenarios
//! - JSON bodies in the server's wire shape for HTTP mocks

pub use assetdesk_core::{
    Asset, AssetId, AssetStatus, Branch, BranchCounts, BranchId, EntityIdType, NamedRef,
    Timestamp, TransferAssetRef, TransferId, TransferRequest, TransferStatus, User, UserId,
    UserRole, HEAD_OFFICE_NAME, KNOWN_CATEGORIES,
};

use chrono::{TimeZone, Utc};

/// Fixed instant so fixtures compare equal across runs.
pub fn epoch() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating AssetDesk entity types.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        // 2020-2030
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
        })
    }

    pub fn arb_asset_status() -> impl Strategy<Value = AssetStatus> {
        prop_oneof![
            Just(AssetStatus::Active),
            Just(AssetStatus::InUse),
            Just(AssetStatus::Damaged),
            Just(AssetStatus::Disposed),
        ]
    }

    pub fn arb_transfer_status() -> impl Strategy<Value = TransferStatus> {
        prop_oneof![
            Just(TransferStatus::Pending),
            Just(TransferStatus::Approved),
            Just(TransferStatus::Rejected),
        ]
    }

    pub fn arb_user_role() -> impl Strategy<Value = UserRole> {
        prop::sample::select(UserRole::all().to_vec())
    }

    pub fn arb_category() -> impl Strategy<Value = String> {
        prop::sample::select(KNOWN_CATEGORIES.to_vec()).prop_map(str::to_string)
    }

    /// Free text that exercises CSV quoting (commas, quotes, spaces).
    pub fn arb_label() -> impl Strategy<Value = String> {
        "[A-Za-z0-9 ,\"]{1,16}"
    }

    pub fn arb_asset() -> impl Strategy<Value = Asset> {
        (
            1i64..100_000,
            arb_label(),
            arb_category(),
            arb_asset_status(),
            0u32..5_000_000,
            1i64..20,
            arb_timestamp(),
        )
            .prop_map(|(id, name, category, status, value, branch, created_at)| {
                let mut asset = fixtures::asset(id, &name, &category, status);
                asset.value = f64::from(value);
                asset.branch_id = BranchId::new(branch);
                asset.created_at = created_at;
                asset
            })
    }

    pub fn arb_assets(max: usize) -> impl Strategy<Value = Vec<Asset>> {
        prop::collection::vec(arb_asset(), 0..max)
    }

    pub fn arb_transfer() -> impl Strategy<Value = TransferRequest> {
        (1i64..10_000, arb_transfer_status(), arb_timestamp()).prop_map(
            |(id, status, request_date)| {
                let mut transfer = fixtures::transfer(id, 1, 2);
                transfer.status = status;
                transfer.request_date = request_date;
                transfer
            },
        )
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built entities for common testing scenarios.

    use super::*;

    pub fn asset(id: i64, name: &str, category: &str, status: AssetStatus) -> Asset {
        let prefix: String = category.chars().take(3).collect::<String>().to_uppercase();
        Asset {
            id: AssetId::new(id),
            asset_code: format!("{}-{:04}", prefix, id),
            alt_code: None,
            name: name.to_string(),
            category: category.to_string(),
            status,
            value: 1000.0,
            branch_id: BranchId::new(1),
            branch: Some(NamedRef::new(HEAD_OFFICE_NAME)),
            center: None,
            section: None,
            asset_type: None,
            quantity: 1,
            inventory_page_no: None,
            purchase_date: None,
            purchase_price: None,
            grn_number: None,
            remarks: None,
            revaluation_price: None,
            transferred_to_consumable: None,
            current_location: None,
            new_section: None,
            board_of_survey_category: None,
            board_of_survey_year: None,
            created_at: epoch(),
        }
    }

    /// The three-asset list used throughout: one each of Active, Disposed, Damaged.
    pub fn mixed_status_assets() -> Vec<Asset> {
        vec![
            asset(1, "Office Desk", "Furniture", AssetStatus::Active),
            asset(2, "Old Printer", "Computer", AssetStatus::Disposed),
            asset(3, "Cracked Monitor", "Computer", AssetStatus::Damaged),
        ]
    }

    pub fn branch(id: i64, name: &str, location: &str) -> Branch {
        Branch {
            id: BranchId::new(id),
            name: name.to_string(),
            location: location.to_string(),
            created_at: epoch(),
            counts: Some(BranchCounts {
                users: 2,
                assets: 10,
            }),
        }
    }

    pub fn branches() -> Vec<Branch> {
        vec![
            branch(1, HEAD_OFFICE_NAME, "Colombo"),
            branch(2, "Kandy", "Central Province"),
            branch(3, "Galle", "Southern Province"),
        ]
    }

    pub fn transfer(id: i64, from: i64, to: i64) -> TransferRequest {
        TransferRequest {
            id: TransferId::new(id),
            asset_id: AssetId::new(id),
            from_branch_id: BranchId::new(from),
            to_branch_id: BranchId::new(to),
            status: TransferStatus::Pending,
            request_date: epoch(),
            reason: "Relocation".to_string(),
            remarks: None,
            asset: TransferAssetRef {
                name: format!("Asset {}", id),
                asset_code: format!("FUR-{:04}", id),
            },
            from_branch: NamedRef::new(format!("Branch {}", from)),
            to_branch: NamedRef::new(format!("Branch {}", to)),
        }
    }

    pub fn user(id: i64, role: UserRole) -> User {
        User {
            id: UserId::new(id),
            name: format!("User {}", id),
            email: format!("user{}@example.com", id),
            role,
            branch: None,
            created_at: epoch(),
        }
    }
}

// ============================================================================
// WIRE BODIES
// ============================================================================

pub mod wire {
    //! JSON bodies shaped like the server's responses.

    use super::*;
    use serde_json::{json, Value};

    pub fn asset(id: i64, name: &str, status: &str) -> Value {
        json!({
            "id": id,
            "assetId": format!("FUR-{:04}", id),
            "name": name,
            "category": "Furniture",
            "status": status,
            "value": 1500,
            "branchId": 1,
            "branch": { "name": HEAD_OFFICE_NAME },
            "createdAt": "2024-01-01T09:00:00.000Z"
        })
    }

    pub fn branch(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "location": "Colombo",
            "createdAt": "2024-01-01T09:00:00.000Z",
            "_count": { "users": 3, "assets": 12 }
        })
    }

    pub fn user(id: i64, role: &str) -> Value {
        json!({
            "id": id,
            "name": format!("User {}", id),
            "email": format!("user{}@example.com", id),
            "role": role,
            "createdAt": "2024-01-01T09:00:00.000Z"
        })
    }

    pub fn transfer(id: i64, status: &str) -> Value {
        json!({
            "id": id,
            "assetId": 10,
            "fromBranchId": 1,
            "toBranchId": 2,
            "status": status,
            "requestDate": "2024-02-01T09:00:00.000Z",
            "reason": "Relocation",
            "asset": { "name": "Desk", "assetId": "FUR-0010" },
            "fromBranch": { "name": HEAD_OFFICE_NAME },
            "toBranch": { "name": "Kandy" }
        })
    }

    pub fn login(token: &str, role: &str) -> Value {
        json!({ "token": token, "user": user(1, role) })
    }
}
