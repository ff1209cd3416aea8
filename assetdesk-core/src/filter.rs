//! List derivation for the pages: search, filter and sort over fetched rows.
//!
//! Everything here is pure. Pages feed the cached collections through these
//! functions on every render, so the visible rows are always a function of
//! the cache plus the filter state.

use crate::entities::{Asset, Branch, TransferRequest, User};
use crate::enums::{AssetStatus, TransferStatus, UserRole};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Case-insensitive substring match. An empty needle matches everything.
fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}

// ============================================================================
// ASSETS
// ============================================================================

/// Status filter for asset lists.
///
/// `All` hides disposed assets; they are only listed when `Disposed` is
/// selected explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AssetStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: AssetStatus) -> bool {
        match self {
            StatusFilter::All => !status.is_disposed(),
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }

    /// All -> Active -> In Use -> Damaged -> Disposed -> All.
    pub fn next(self) -> Self {
        let statuses = AssetStatus::all();
        match self {
            StatusFilter::All => StatusFilter::Only(statuses[0]),
            StatusFilter::Only(current) => {
                let idx = statuses.iter().position(|s| *s == current).unwrap_or(0);
                statuses
                    .get(idx + 1)
                    .map(|s| StatusFilter::Only(*s))
                    .unwrap_or(StatusFilter::All)
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Only(status) => status.as_wire_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetSort {
    /// Newest first, matching the server's default ordering.
    #[default]
    CreatedDesc,
    Code,
    Name,
    ValueDesc,
}

impl AssetSort {
    pub fn next(self) -> Self {
        match self {
            AssetSort::CreatedDesc => AssetSort::Code,
            AssetSort::Code => AssetSort::Name,
            AssetSort::Name => AssetSort::ValueDesc,
            AssetSort::ValueDesc => AssetSort::CreatedDesc,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetSort::CreatedDesc => "Newest",
            AssetSort::Code => "Code",
            AssetSort::Name => "Name",
            AssetSort::ValueDesc => "Value",
        }
    }

    fn compare(&self, a: &Asset, b: &Asset) -> Ordering {
        match self {
            AssetSort::CreatedDesc => b.created_at.cmp(&a.created_at),
            AssetSort::Code => a.asset_code.cmp(&b.asset_code),
            AssetSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            AssetSort::ValueDesc => b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal),
        }
    }
}

/// Filter state of an asset list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetFilter {
    pub search: String,
    pub status: StatusFilter,
    /// `None` means every category.
    pub category: Option<String>,
    pub sort: AssetSort,
}

impl AssetFilter {
    pub fn matches(&self, asset: &Asset) -> bool {
        let needle = self.search.trim().to_lowercase();
        self.matches_with(asset, &needle)
    }

    fn matches_with(&self, asset: &Asset, needle: &str) -> bool {
        let text = contains_ci(&asset.name, needle)
            || contains_ci(&asset.asset_code, needle)
            || contains_ci(&asset.category, needle);
        let category = self
            .category
            .as_deref()
            .map_or(true, |c| asset.category == c);
        text && category && self.status.matches(asset.status)
    }

    /// Visible rows in display order.
    pub fn apply<'a>(&self, assets: &'a [Asset]) -> Vec<&'a Asset> {
        let needle = self.search.trim().to_lowercase();
        let mut rows: Vec<&Asset> = assets
            .iter()
            .filter(|a| self.matches_with(a, &needle))
            .collect();
        rows.sort_by(|a, b| self.sort.compare(a, b));
        rows
    }

    /// Steps through `None` then each category in `categories`.
    pub fn cycle_category(&mut self, categories: &[&str]) {
        self.category = match &self.category {
            None => categories.first().map(|c| c.to_string()),
            Some(current) => categories
                .iter()
                .position(|c| c == current)
                .and_then(|idx| categories.get(idx + 1))
                .map(|c| c.to_string()),
        };
    }

    pub fn is_default(&self) -> bool {
        self == &AssetFilter::default()
    }
}

/// Sum of `value` over the given rows.
pub fn total_value<'a>(rows: impl IntoIterator<Item = &'a Asset>) -> f64 {
    rows.into_iter().map(|a| a.value).sum()
}

// ============================================================================
// BRANCHES
// ============================================================================

/// Branch list split the way the branches page lays it out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BranchSplit<'a> {
    pub head_office: Option<&'a Branch>,
    pub regional: Vec<&'a Branch>,
}

impl<'a> BranchSplit<'a> {
    pub fn len(&self) -> usize {
        self.regional.len() + usize::from(self.head_office.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Head office first, then regional branches.
    pub fn ordered(&self) -> Vec<&'a Branch> {
        self.head_office
            .into_iter()
            .chain(self.regional.iter().copied())
            .collect()
    }
}

/// Splits out the head office and keeps regional branches matching `search`
/// on name or location, sorted by name.
pub fn split_branches<'a>(branches: &'a [Branch], search: &str) -> BranchSplit<'a> {
    let needle = search.trim().to_lowercase();
    let mut split = BranchSplit::default();
    for branch in branches {
        if !(contains_ci(&branch.name, &needle) || contains_ci(&branch.location, &needle)) {
            continue;
        }
        if branch.is_head_office() && split.head_office.is_none() {
            split.head_office = Some(branch);
        } else {
            split.regional.push(branch);
        }
    }
    split.regional.sort_by(|a, b| a.name.cmp(&b.name));
    split
}

// ============================================================================
// TRANSFERS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

impl TransferFilter {
    pub fn matches(&self, status: TransferStatus) -> bool {
        match self {
            TransferFilter::All => true,
            TransferFilter::Pending => status == TransferStatus::Pending,
            TransferFilter::Approved => status == TransferStatus::Approved,
            TransferFilter::Rejected => status == TransferStatus::Rejected,
        }
    }

    pub fn next(self) -> Self {
        match self {
            TransferFilter::All => TransferFilter::Pending,
            TransferFilter::Pending => TransferFilter::Approved,
            TransferFilter::Approved => TransferFilter::Rejected,
            TransferFilter::Rejected => TransferFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TransferFilter::All => "All",
            TransferFilter::Pending => "Pending",
            TransferFilter::Approved => "Approved",
            TransferFilter::Rejected => "Rejected",
        }
    }

    /// Matching transfers, newest request first.
    pub fn apply<'a>(&self, transfers: &'a [TransferRequest]) -> Vec<&'a TransferRequest> {
        let mut rows: Vec<&TransferRequest> =
            transfers.iter().filter(|t| self.matches(t.status)).collect();
        rows.sort_by(|a, b| b.request_date.cmp(&a.request_date));
        rows
    }
}

// ============================================================================
// USERS
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFilter {
    pub search: String,
    pub role: Option<UserRole>,
}

impl UserFilter {
    pub fn apply<'a>(&self, users: &'a [User]) -> Vec<&'a User> {
        let needle = self.search.trim().to_lowercase();
        users
            .iter()
            .filter(|u| contains_ci(&u.name, &needle) || contains_ci(&u.email, &needle))
            .filter(|u| self.role.map_or(true, |r| u.role == r))
            .collect()
    }

    /// `None` then each role in turn.
    pub fn cycle_role(&mut self) {
        let roles = UserRole::all();
        self.role = match self.role {
            None => roles.first().copied(),
            Some(current) => roles
                .iter()
                .position(|r| *r == current)
                .and_then(|idx| roles.get(idx + 1))
                .copied(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{AssetId, BranchId, EntityIdType};
    use chrono::{TimeZone, Utc};

    fn asset(id: i64, name: &str, category: &str, status: AssetStatus) -> Asset {
        Asset {
            id: AssetId::new(id),
            asset_code: format!("{}-{:04}", &category[..3].to_uppercase(), id),
            alt_code: None,
            name: name.to_string(),
            category: category.to_string(),
            status,
            value: id as f64 * 100.0,
            branch_id: BranchId::new(1),
            branch: None,
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
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::days(id),
        }
    }

    fn branch(id: i64, name: &str, location: &str) -> Branch {
        Branch {
            id: BranchId::new(id),
            name: name.to_string(),
            location: location.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            counts: None,
        }
    }

    #[test]
    fn default_filter_hides_disposed() {
        let assets = vec![
            asset(1, "Desk", "Furniture", AssetStatus::Active),
            asset(2, "Chair", "Furniture", AssetStatus::Disposed),
            asset(3, "Laptop", "Computer", AssetStatus::Damaged),
        ];

        let filter = AssetFilter::default();
        assert_eq!(filter.apply(&assets).len(), 2);

        let disposed = AssetFilter {
            status: StatusFilter::Only(AssetStatus::Disposed),
            ..AssetFilter::default()
        };
        let rows = disposed.apply(&assets);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Chair");
    }

    #[test]
    fn search_covers_name_code_and_category() {
        let assets = vec![
            asset(1, "Desk", "Furniture", AssetStatus::Active),
            asset(2, "Laptop", "Computer", AssetStatus::InUse),
        ];
        let mut filter = AssetFilter {
            search: "LAP".into(),
            ..AssetFilter::default()
        };
        assert_eq!(filter.apply(&assets).len(), 1);

        filter.search = "com-0002".into();
        assert_eq!(filter.apply(&assets)[0].name, "Laptop");

        filter.search = "furn".into();
        assert_eq!(filter.apply(&assets)[0].name, "Desk");
    }

    #[test]
    fn category_filter_is_exact() {
        let assets = vec![
            asset(1, "Desk", "Furniture", AssetStatus::Active),
            asset(2, "Laptop", "Computer", AssetStatus::Active),
        ];
        let filter = AssetFilter {
            category: Some("Computer".into()),
            ..AssetFilter::default()
        };
        let rows = filter.apply(&assets);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "Computer");
    }

    #[test]
    fn sort_orders() {
        let assets = vec![
            asset(1, "b", "Furniture", AssetStatus::Active),
            asset(3, "a", "Furniture", AssetStatus::Active),
            asset(2, "c", "Furniture", AssetStatus::Active),
        ];
        let mut filter = AssetFilter::default();
        let ids: Vec<i64> = filter.apply(&assets).iter().map(|a| a.id.as_i64()).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        filter.sort = AssetSort::Name;
        let names: Vec<&str> = filter.apply(&assets).iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        filter.sort = AssetSort::ValueDesc;
        let ids: Vec<i64> = filter.apply(&assets).iter().map(|a| a.id.as_i64()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn status_filter_cycles_back_to_all() {
        let mut filter = StatusFilter::All;
        for _ in 0..AssetStatus::all().len() {
            filter = filter.next();
            assert_ne!(filter, StatusFilter::All);
        }
        assert_eq!(filter.next(), StatusFilter::All);
    }

    #[test]
    fn category_cycle_wraps_to_none() {
        let mut filter = AssetFilter::default();
        let categories = ["Furniture", "Computer"];
        filter.cycle_category(&categories);
        assert_eq!(filter.category.as_deref(), Some("Furniture"));
        filter.cycle_category(&categories);
        assert_eq!(filter.category.as_deref(), Some("Computer"));
        filter.cycle_category(&categories);
        assert_eq!(filter.category, None);
    }

    #[test]
    fn head_office_is_split_out() {
        let branches = vec![
            branch(2, "Kandy", "Central"),
            branch(1, "Head Office", "Colombo"),
            branch(3, "Galle", "Southern"),
        ];
        let split = split_branches(&branches, "");
        assert_eq!(split.head_office.map(|b| b.id.as_i64()), Some(1));
        let names: Vec<&str> = split.regional.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Galle", "Kandy"]);
        assert_eq!(split.ordered()[0].name, "Head Office");

        let split = split_branches(&branches, "south");
        assert!(split.head_office.is_none());
        assert_eq!(split.len(), 1);
    }

    #[test]
    fn user_role_cycle_visits_every_role() {
        let mut filter = UserFilter::default();
        let mut seen = Vec::new();
        loop {
            filter.cycle_role();
            match filter.role {
                Some(role) => seen.push(role),
                None => break,
            }
        }
        assert_eq!(seen, UserRole::all());
    }
}

#[cfg(test)]
mod prop_tests {
    use super::tests_support::*;
    use super::*;
    use proptest::prelude::*;

    fn status_strategy() -> impl Strategy<Value = AssetStatus> {
        prop::sample::select(AssetStatus::all().to_vec())
    }

    proptest! {
        #[test]
        fn prop_default_never_shows_disposed(statuses in prop::collection::vec(status_strategy(), 0..40)) {
            let assets = assets_with_statuses(&statuses);
            let rows = AssetFilter::default().apply(&assets);
            prop_assert!(rows.iter().all(|a| a.status != AssetStatus::Disposed));
            let expected = statuses.iter().filter(|s| !s.is_disposed()).count();
            prop_assert_eq!(rows.len(), expected);
        }

        #[test]
        fn prop_explicit_status_shows_only_that_status(
            statuses in prop::collection::vec(status_strategy(), 0..40),
            wanted in status_strategy(),
        ) {
            let assets = assets_with_statuses(&statuses);
            let filter = AssetFilter { status: StatusFilter::Only(wanted), ..AssetFilter::default() };
            let rows = filter.apply(&assets);
            prop_assert!(rows.iter().all(|a| a.status == wanted));
            prop_assert_eq!(rows.len(), statuses.iter().filter(|s| **s == wanted).count());
        }

        #[test]
        fn prop_search_only_narrows(
            statuses in prop::collection::vec(status_strategy(), 0..30),
            search in "[a-z]{0,3}",
        ) {
            let assets = assets_with_statuses(&statuses);
            let all = AssetFilter::default().apply(&assets).len();
            let narrowed = AssetFilter { search, ..AssetFilter::default() }.apply(&assets).len();
            prop_assert!(narrowed <= all);
        }
    }
}

#[cfg(test)]
mod tests_support {
    use crate::entities::Asset;
    use crate::enums::AssetStatus;
    use crate::identity::{AssetId, BranchId, EntityIdType};
    use chrono::{TimeZone, Utc};

    pub fn assets_with_statuses(statuses: &[AssetStatus]) -> Vec<Asset> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| Asset {
                id: AssetId::new(i as i64 + 1),
                asset_code: format!("GEN-{:04}", i + 1),
                alt_code: None,
                name: format!("item {}", i),
                category: "Furniture".into(),
                status: *status,
                value: 10.0,
                branch_id: BranchId::new(1),
                branch: None,
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
                created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            })
            .collect()
    }
}
