//! Branch endpoints.

use crate::error::ApiResult;
use crate::http::HttpClient;
use assetdesk_core::validation::validate_branch;
use assetdesk_core::{Branch, BranchId, BranchInput};
use serde::de::IgnoredAny;

pub struct BranchesApi<'a> {
    http: &'a HttpClient,
}

impl HttpClient {
    pub fn branches(&self) -> BranchesApi<'_> {
        BranchesApi { http: self }
    }
}

impl BranchesApi<'_> {
    pub async fn list(&self) -> ApiResult<Vec<Branch>> {
        self.http.get("/branches").await
    }

    pub async fn get(&self, id: BranchId) -> ApiResult<Branch> {
        self.http.get(&format!("/branches/{}", id)).await
    }

    pub async fn create(&self, input: &BranchInput) -> ApiResult<Branch> {
        validate_branch(input)?;
        self.http.post("/branches", input).await
    }

    pub async fn update(&self, id: BranchId, input: &BranchInput) -> ApiResult<Branch> {
        validate_branch(input)?;
        self.http.put(&format!("/branches/{}", id), input).await
    }

    pub async fn delete(&self, id: BranchId) -> ApiResult<()> {
        self.http
            .delete::<IgnoredAny>(&format!("/branches/{}", id))
            .await
            .map(|_| ())
    }
}
