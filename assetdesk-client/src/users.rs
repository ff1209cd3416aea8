//! User administration endpoints.

use crate::error::ApiResult;
use crate::http::HttpClient;
use assetdesk_core::validation::validate_new_user;
use assetdesk_core::{NewUser, RoleUpdate, User, UserId, UserRole};
use serde::de::IgnoredAny;

pub struct UsersApi<'a> {
    http: &'a HttpClient,
}

impl HttpClient {
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi { http: self }
    }
}

impl UsersApi<'_> {
    pub async fn list(&self) -> ApiResult<Vec<User>> {
        self.http.get("/users").await
    }

    pub async fn create(&self, user: &NewUser) -> ApiResult<User> {
        validate_new_user(user)?;
        self.http.post("/users", user).await
    }

    pub async fn update_role(&self, id: UserId, role: UserRole) -> ApiResult<User> {
        self.http
            .put(&format!("/users/{}/role", id), &RoleUpdate { role })
            .await
    }

    pub async fn delete(&self, id: UserId) -> ApiResult<()> {
        self.http
            .delete::<IgnoredAny>(&format!("/users/{}", id))
            .await
            .map(|_| ())
    }
}
