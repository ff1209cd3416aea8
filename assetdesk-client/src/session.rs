//! Session context: the signed-in user and their bearer token.
//!
//! The session lives for the process only. Nothing here touches disk.

use crate::error::ApiError;
use assetdesk_core::{LoginResponse, User, UserRole};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl From<LoginResponse> for Session {
    fn from(response: LoginResponse) -> Self {
        Self {
            token: response.token,
            user: response.user,
        }
    }
}

/// What the caller should do after an error passed through [`SessionStore::guard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Not an auth failure. Handle the error locally.
    Unaffected,
    /// The credential was rejected and the session has been cleared.
    SignedOut,
}

/// Shared holder of the current session. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&self, session: Session) {
        tracing::info!(user = %session.user.email, role = %session.user.role, "signed in");
        *self.inner.write() = Some(session);
    }

    pub fn logout(&self) {
        if self.inner.write().take().is_some() {
            tracing::info!("signed out");
        }
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.inner.read().as_ref().map(|s| s.user.clone())
    }

    pub fn role(&self) -> Option<UserRole> {
        self.inner.read().as_ref().map(|s| s.user.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_some()
    }

    pub fn can_manage_users(&self) -> bool {
        self.role().is_some_and(|r| r.can_manage_users())
    }

    /// Reacts to an error from any request: auth failures end the session.
    pub fn guard(&self, err: &ApiError) -> AuthOutcome {
        if err.is_auth_failure() {
            tracing::warn!(error = %err, "credential rejected, clearing session");
            self.logout();
            AuthOutcome::SignedOut
        } else {
            AuthOutcome::Unaffected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetdesk_core::{EntityIdType, UserId};
    use chrono::Utc;

    fn session(role: UserRole) -> Session {
        Session {
            token: "tok".into(),
            user: User {
                id: UserId::new(1),
                name: "Nimal".into(),
                email: "nimal@example.com".into(),
                role,
                branch: None,
                created_at: Utc::now(),
            },
        }
    }

    #[test]
    fn clones_share_state() {
        let store = SessionStore::new();
        let clone = store.clone();
        store.login(session(UserRole::Admin));
        assert_eq!(clone.token().as_deref(), Some("tok"));
        clone.logout();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn guard_clears_on_auth_failure_only() {
        let store = SessionStore::new();
        store.login(session(UserRole::Staff));

        let outcome = store.guard(&ApiError::from_status(500, "boom"));
        assert_eq!(outcome, AuthOutcome::Unaffected);
        assert!(store.is_authenticated());

        let outcome = store.guard(&ApiError::from_status(401, "expired"));
        assert_eq!(outcome, AuthOutcome::SignedOut);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn only_super_admin_manages_users() {
        let store = SessionStore::new();
        assert!(!store.can_manage_users());
        store.login(session(UserRole::Admin));
        assert!(!store.can_manage_users());
        store.login(session(UserRole::SuperAdmin));
        assert!(store.can_manage_users());
    }
}
