//! Writes issued from the pages, and the cache entries each one invalidates.

use crate::queries;
use assetdesk_client::{ApiError, HttpClient};
use assetdesk_core::{
    AssetId, AssetUpdate, BranchId, BranchInput, NewAsset, NewTransfer, NewUser, TransferDecision,
    TransferId, UserId, UserRole,
};
use assetdesk_query::{QueryClient, QueryKey};

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateAsset(NewAsset),
    UpdateAsset { id: AssetId, update: AssetUpdate },
    DisposeAsset { id: AssetId, reason: String },
    RestoreAsset(AssetId),
    RequestTransfer(NewTransfer),
    ReviewTransfer {
        id: TransferId,
        decision: TransferDecision,
        remarks: Option<String>,
    },
    CreateBranch(BranchInput),
    UpdateBranch { id: BranchId, input: BranchInput },
    DeleteBranch(BranchId),
    CreateUser(NewUser),
    UpdateRole { id: UserId, role: UserRole },
    DeleteUser(UserId),
    ChangePassword { old_password: String, new_password: String },
}

impl Mutation {
    /// Key prefixes to invalidate once the server accepted the write.
    pub fn invalidates(&self) -> Vec<QueryKey> {
        match self {
            Mutation::CreateAsset(_)
            | Mutation::UpdateAsset { .. }
            | Mutation::DisposeAsset { .. }
            | Mutation::RestoreAsset(_) => {
                vec![queries::assets_key(), queries::dashboard_key()]
            }
            Mutation::RequestTransfer(_) => vec![
                queries::transfers_key(),
                queries::assets_key(),
                queries::dashboard_key(),
            ],
            Mutation::ReviewTransfer { .. } => vec![
                queries::transfers_key(),
                queries::assets_key(),
                queries::branches_key(),
                queries::dashboard_key(),
            ],
            Mutation::CreateBranch(_) | Mutation::UpdateBranch { .. } | Mutation::DeleteBranch(_) => {
                vec![queries::branches_key(), queries::branch_prefix()]
            }
            Mutation::CreateUser(_) | Mutation::UpdateRole { .. } | Mutation::DeleteUser(_) => {
                vec![queries::users_key()]
            }
            Mutation::ChangePassword { .. } => Vec::new(),
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Mutation::CreateAsset(_) => "Asset added",
            Mutation::UpdateAsset { .. } => "Asset updated",
            Mutation::DisposeAsset { .. } => "Asset disposed",
            Mutation::RestoreAsset(_) => "Asset restored",
            Mutation::RequestTransfer(_) => "Transfer requested",
            Mutation::ReviewTransfer {
                decision: TransferDecision::Approved,
                ..
            } => "Transfer approved",
            Mutation::ReviewTransfer {
                decision: TransferDecision::Rejected,
                ..
            } => "Transfer rejected",
            Mutation::CreateBranch(_) => "Branch added",
            Mutation::UpdateBranch { .. } => "Branch updated",
            Mutation::DeleteBranch(_) => "Branch deleted",
            Mutation::CreateUser(_) => "User added",
            Mutation::UpdateRole { .. } => "Role updated",
            Mutation::DeleteUser(_) => "User deleted",
            Mutation::ChangePassword { .. } => "Password changed",
        }
    }

    /// Sends the request. The response body is dropped: pages pick up the
    /// new server state through invalidation.
    pub async fn send(&self, api: &HttpClient) -> Result<(), ApiError> {
        match self {
            Mutation::CreateAsset(asset) => api.assets().create(asset).await.map(drop),
            Mutation::UpdateAsset { id, update } => api.assets().update(*id, update).await.map(drop),
            Mutation::DisposeAsset { id, reason } => api.assets().dispose(*id, reason).await.map(drop),
            Mutation::RestoreAsset(id) => api.assets().restore(*id).await.map(drop),
            Mutation::RequestTransfer(transfer) => api.transfers().request(transfer).await.map(drop),
            Mutation::ReviewTransfer {
                id,
                decision,
                remarks,
            } => api
                .transfers()
                .update_status(*id, *decision, remarks.clone())
                .await
                .map(drop),
            Mutation::CreateBranch(input) => api.branches().create(input).await.map(drop),
            Mutation::UpdateBranch { id, input } => api.branches().update(*id, input).await.map(drop),
            Mutation::DeleteBranch(id) => api.branches().delete(*id).await,
            Mutation::CreateUser(user) => api.users().create(user).await.map(drop),
            Mutation::UpdateRole { id, role } => api.users().update_role(*id, *role).await.map(drop),
            Mutation::DeleteUser(id) => api.users().delete(*id).await,
            Mutation::ChangePassword {
                old_password,
                new_password,
            } => api
                .auth()
                .change_password(old_password, new_password)
                .await
                .map(drop),
        }
    }

    /// Runs the mutation through the coordinator so its invalidations apply.
    pub async fn run(&self, queries: &QueryClient, api: &HttpClient) -> Result<(), ApiError> {
        tracing::info!(mutation = self.success_message(), "submitting");
        queries.mutate(self.send(api), &self.invalidates()).await
    }
}
