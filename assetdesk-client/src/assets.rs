//! Asset endpoints.

use crate::error::ApiResult;
use crate::http::HttpClient;
use assetdesk_core::validation::{validate_asset_update, validate_dispose_reason, validate_new_asset};
use assetdesk_core::{
    Asset, AssetHistoryEntry, AssetId, AssetUpdate, BranchId, DisposeRequest, MasterData,
    NewAsset, NextCodeResponse, ValidationError,
};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    branch_id: Option<BranchId>,
}

#[derive(Serialize)]
struct NextCodeQuery<'a> {
    category: &'a str,
}

pub struct AssetsApi<'a> {
    http: &'a HttpClient,
}

impl HttpClient {
    pub fn assets(&self) -> AssetsApi<'_> {
        AssetsApi { http: self }
    }
}

impl AssetsApi<'_> {
    /// All assets, or only those of `branch_id`.
    pub async fn list(&self, branch_id: Option<BranchId>) -> ApiResult<Vec<Asset>> {
        self.http
            .get_with_query("/assets", &ListQuery { branch_id })
            .await
    }

    pub async fn create(&self, asset: &NewAsset) -> ApiResult<Asset> {
        validate_new_asset(asset)?;
        self.http.post("/assets", asset).await
    }

    pub async fn update(&self, id: AssetId, update: &AssetUpdate) -> ApiResult<Asset> {
        validate_asset_update(update)?;
        self.http.put(&format!("/assets/{}", id), update).await
    }

    /// Soft delete. The asset moves to `Disposed` and can be restored.
    pub async fn dispose(&self, id: AssetId, reason: &str) -> ApiResult<Asset> {
        validate_dispose_reason(reason)?;
        let body = DisposeRequest {
            reason: reason.trim().to_string(),
        };
        self.http
            .delete_with_body(&format!("/assets/{}", id), &body)
            .await
    }

    pub async fn restore(&self, id: AssetId) -> ApiResult<Asset> {
        self.http.patch(&format!("/assets/{}/restore", id)).await
    }

    pub async fn history(&self, id: AssetId) -> ApiResult<Vec<AssetHistoryEntry>> {
        self.http.get(&format!("/assets/{}/history", id)).await
    }

    /// Next free asset code for a category, e.g. `FUR-0013`.
    pub async fn next_code(&self, category: &str) -> ApiResult<String> {
        if category.trim().is_empty() {
            return Err(ValidationError::missing("category").into());
        }
        let response: NextCodeResponse = self
            .http
            .get_with_query("/assets/next-code", &NextCodeQuery { category })
            .await?;
        Ok(response.next_code)
    }

    pub async fn master_data(&self) -> ApiResult<MasterData> {
        self.http.get("/assets/master-data").await
    }
}
