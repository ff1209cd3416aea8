use crate::error::ApiResult;
use crate::http::HttpClient;
use assetdesk_core::DashboardStats;

pub struct DashboardApi<'a> {
    http: &'a HttpClient,
}

impl HttpClient {
    pub fn dashboard(&self) -> DashboardApi<'_> {
        DashboardApi { http: self }
    }
}

impl DashboardApi<'_> {
    pub async fn stats(&self) -> ApiResult<DashboardStats> {
        self.http.get("/dashboard/stats").await
    }
}
