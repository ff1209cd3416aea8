//! Query keys and subscriptions used by the pages.
//!
//! Every asset-derived entry lives under `["assets", ..]` so a single prefix
//! invalidation refreshes lists, history and the next-code suggestion.

use assetdesk_client::HttpClient;
use assetdesk_core::{
    Asset, AssetHistoryEntry, AssetId, Branch, BranchId, DashboardStats, EntityIdType, MasterData,
    TransferRequest, User,
};
use assetdesk_query::{query_key, QueryClient, QueryKey, QueryObserver, RefetchPolicy};

pub fn assets_key() -> QueryKey {
    query_key!["assets"]
}

pub fn branch_assets_key(id: BranchId) -> QueryKey {
    query_key!["assets", { "branchId" => id.as_i64() }]
}

pub fn asset_history_key(id: AssetId) -> QueryKey {
    query_key!["assets", "history", id.as_i64()]
}

pub fn next_code_key(category: &str) -> QueryKey {
    query_key!["assets", "next-code", category]
}

pub fn master_data_key() -> QueryKey {
    query_key!["master-data"]
}

pub fn branches_key() -> QueryKey {
    query_key!["branches"]
}

pub fn branch_key(id: BranchId) -> QueryKey {
    query_key!["branch", id.as_i64()]
}

/// Prefix of every single-branch entry.
pub fn branch_prefix() -> QueryKey {
    query_key!["branch"]
}

pub fn transfers_key() -> QueryKey {
    query_key!["transfers"]
}

pub fn users_key() -> QueryKey {
    query_key!["users"]
}

pub fn dashboard_key() -> QueryKey {
    query_key!["dashboard"]
}

pub fn assets(queries: &QueryClient, api: &HttpClient, policy: RefetchPolicy) -> QueryObserver<Vec<Asset>> {
    let api = api.clone();
    queries.query(assets_key(), policy, move || {
        let api = api.clone();
        async move { api.assets().list(None).await }
    })
}

pub fn branch_assets(
    queries: &QueryClient,
    api: &HttpClient,
    policy: RefetchPolicy,
    id: BranchId,
) -> QueryObserver<Vec<Asset>> {
    let api = api.clone();
    queries.query(branch_assets_key(id), policy, move || {
        let api = api.clone();
        async move { api.assets().list(Some(id)).await }
    })
}

pub fn asset_history(
    queries: &QueryClient,
    api: &HttpClient,
    id: AssetId,
) -> QueryObserver<Vec<AssetHistoryEntry>> {
    let api = api.clone();
    queries.query(asset_history_key(id), RefetchPolicy::Always, move || {
        let api = api.clone();
        async move { api.assets().history(id).await }
    })
}

pub fn next_code(queries: &QueryClient, api: &HttpClient, category: &str) -> QueryObserver<String> {
    let api = api.clone();
    let owned = category.to_string();
    queries.query(next_code_key(category), RefetchPolicy::Always, move || {
        let api = api.clone();
        let category = owned.clone();
        async move { api.assets().next_code(&category).await }
    })
}

/// Reference data barely changes, so it is only fetched once per session.
pub fn master_data(queries: &QueryClient, api: &HttpClient) -> QueryObserver<MasterData> {
    let api = api.clone();
    queries.query(master_data_key(), RefetchPolicy::Never, move || {
        let api = api.clone();
        async move { api.assets().master_data().await }
    })
}

pub fn branches(queries: &QueryClient, api: &HttpClient, policy: RefetchPolicy) -> QueryObserver<Vec<Branch>> {
    let api = api.clone();
    queries.query(branches_key(), policy, move || {
        let api = api.clone();
        async move { api.branches().list().await }
    })
}

pub fn branch(
    queries: &QueryClient,
    api: &HttpClient,
    policy: RefetchPolicy,
    id: BranchId,
) -> QueryObserver<Branch> {
    let api = api.clone();
    queries.query(branch_key(id), policy, move || {
        let api = api.clone();
        async move { api.branches().get(id).await }
    })
}

pub fn transfers(
    queries: &QueryClient,
    api: &HttpClient,
    policy: RefetchPolicy,
) -> QueryObserver<Vec<TransferRequest>> {
    let api = api.clone();
    queries.query(transfers_key(), policy, move || {
        let api = api.clone();
        async move { api.transfers().list().await }
    })
}

pub fn users(queries: &QueryClient, api: &HttpClient, policy: RefetchPolicy) -> QueryObserver<Vec<User>> {
    let api = api.clone();
    queries.query(users_key(), policy, move || {
        let api = api.clone();
        async move { api.users().list().await }
    })
}

pub fn dashboard(
    queries: &QueryClient,
    api: &HttpClient,
    policy: RefetchPolicy,
) -> QueryObserver<DashboardStats> {
    let api = api.clone();
    queries.query(dashboard_key(), policy, move || {
        let api = api.clone();
        async move { api.dashboard().stats().await }
    })
}
