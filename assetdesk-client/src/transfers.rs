//! Transfer request endpoints.

use crate::error::ApiResult;
use crate::http::HttpClient;
use assetdesk_core::validation::validate_transfer_request;
use assetdesk_core::{NewTransfer, TransferDecision, TransferId, TransferRequest, TransferStatusUpdate};

pub struct TransfersApi<'a> {
    http: &'a HttpClient,
}

impl HttpClient {
    pub fn transfers(&self) -> TransfersApi<'_> {
        TransfersApi { http: self }
    }
}

impl TransfersApi<'_> {
    pub async fn list(&self) -> ApiResult<Vec<TransferRequest>> {
        self.http.get("/transfers").await
    }

    pub async fn request(&self, transfer: &NewTransfer) -> ApiResult<TransferRequest> {
        validate_transfer_request(transfer)?;
        self.http.post("/transfers", transfer).await
    }

    /// Approves or rejects a pending request.
    pub async fn update_status(
        &self,
        id: TransferId,
        status: TransferDecision,
        remarks: Option<String>,
    ) -> ApiResult<TransferRequest> {
        let body = TransferStatusUpdate {
            status,
            remarks: remarks.filter(|r| !r.trim().is_empty()),
        };
        self.http
            .put(&format!("/transfers/{}/status", id), &body)
            .await
    }
}
