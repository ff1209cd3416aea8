//! Authentication endpoints.

use crate::error::ApiResult;
use crate::http::HttpClient;
use crate::session::Session;
use assetdesk_core::validation::{validate_login, MIN_PASSWORD_LEN};
use assetdesk_core::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    ResetPasswordRequest, ValidationError,
};

pub struct AuthApi<'a> {
    http: &'a HttpClient,
}

impl HttpClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { http: self }
    }
}

fn check_new_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

impl AuthApi<'_> {
    /// Exchanges credentials for a session and stores it in the shared session.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<Session> {
        validate_login(email, password)?;
        let body = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.http.post("/auth/login", &body).await?;
        let session = Session::from(response);
        self.http.session().login(session.clone());
        Ok(session)
    }

    pub fn logout(&self) {
        self.http.session().logout();
    }

    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> ApiResult<MessageResponse> {
        if old_password.is_empty() {
            return Err(ValidationError::missing("oldPassword").into());
        }
        check_new_password(new_password)?;
        let body = ChangePasswordRequest {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.http.post("/auth/change-password", &body).await
    }

    pub async fn forgot_password(&self, email: &str) -> ApiResult<MessageResponse> {
        if email.trim().is_empty() {
            return Err(ValidationError::missing("email").into());
        }
        let body = ForgotPasswordRequest {
            email: email.trim().to_string(),
        };
        self.http.post("/auth/forgot-password", &body).await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> ApiResult<MessageResponse> {
        if token.trim().is_empty() {
            return Err(ValidationError::missing("token").into());
        }
        check_new_password(new_password)?;
        let body = ResetPasswordRequest {
            token: token.trim().to_string(),
            new_password: new_password.to_string(),
        };
        self.http.post("/auth/reset-password", &body).await
    }
}
