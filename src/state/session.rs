//! Session store for the current marketplace user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session is the client's belief about who is logged in. It is created
//! by a successful identity fetch (at boot or after login/register) and
//! cleared on logout or a failed identity fetch. Only this store writes it;
//! the route guard and views read it.
//!
//! FAILURE MODEL
//! =============
//! Explicit user actions (login, register, fetch) record a human-readable
//! error and return it. The passive boot check and logout never fail; they
//! report what happened through [`InitOutcome`] and [`LogoutOutcome`].

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::net::api::AuthApi;
use crate::net::credentials::CredentialStore;
use crate::net::types::{LoginCredentials, RegisterData, Role, UserResponse};

const DEFAULT_ROLE: &str = "USER";

/// Identity of the logged-in user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl SessionUser {
    /// Validate an identity payload.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidIdentity`] when `id` is absent or zero, or
    /// `username`/`email` are absent or empty.
    pub fn try_from_response(response: UserResponse) -> Result<Self, ApiError> {
        let id = response.id.filter(|id| *id != 0).ok_or(ApiError::InvalidIdentity { field: "id" })?;
        let username = response
            .username
            .filter(|s| !s.is_empty())
            .ok_or(ApiError::InvalidIdentity { field: "username" })?;
        let email = response
            .email
            .filter(|s| !s.is_empty())
            .ok_or(ApiError::InvalidIdentity { field: "email" })?;
        let role = response.role.map_or(DEFAULT_ROLE, Role::as_str);
        Ok(Self { id, username, email, roles: vec![role.to_owned()] })
    }
}

/// Observable session state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<SessionUser>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Result of the passive identity check.
#[derive(Debug)]
pub enum InitOutcome {
    Authenticated(SessionUser),
    /// The check failed; the session was cleared and the error discarded.
    Anonymous(ApiError),
}

impl InitOutcome {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

/// Result of a logout. The local session is cleared either way.
#[derive(Debug)]
pub enum LogoutOutcome {
    Confirmed,
    ServerFailed(ApiError),
}

pub struct SessionStore {
    api: Arc<dyn AuthApi>,
    credentials: Arc<CredentialStore>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, credentials: Arc<CredentialStore>) -> Self {
        Self { api, credentials, state: RwLock::new(SessionState::default()) }
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn user(&self) -> Option<SessionUser> {
        self.state.read().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.user.is_some()
    }

    /// Roles of the current user; empty when logged out.
    pub async fn user_roles(&self) -> Vec<String> {
        self.state
            .read()
            .await
            .user
            .as_ref()
            .map(|u| u.roles.clone())
            .unwrap_or_default()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    /// Establish identity from the server-side session.
    ///
    /// Never fails: any error clears both the user and the error field.
    /// Safe to call repeatedly or concurrently; the last completion wins.
    pub async fn initialize(&self) -> InitOutcome {
        let result = self.resolve_identity().await;
        let mut state = self.state.write().await;
        match result {
            Ok(user) => {
                tracing::info!(user_id = user.id, username = %user.username, "session established");
                state.user = Some(user.clone());
                InitOutcome::Authenticated(user)
            }
            Err(err) => {
                tracing::debug!(error = %err, "no session at boot");
                state.user = None;
                state.error = None;
                InitOutcome::Anonymous(err)
            }
        }
    }

    /// Refresh identity from the server, recording any failure.
    ///
    /// # Errors
    ///
    /// Transport or server failure, or an identity payload missing required fields.
    pub async fn fetch_user(&self) -> Result<SessionUser, ApiError> {
        self.state.write().await.loading = true;
        let result = self.resolve_identity().await;
        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(user) => {
                state.user = Some(user.clone());
                Ok(user)
            }
            Err(err) => {
                state.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    /// Log in, then refresh identity.
    ///
    /// # Errors
    ///
    /// The login call or the follow-up identity fetch failed; the message is
    /// also stored in [`SessionState::error`].
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<SessionUser, ApiError> {
        self.begin_action().await;
        let result = match self.api.login(credentials).await {
            Ok(()) => self.fetch_user().await,
            Err(err) => Err(err),
        };
        self.finish_action(result, "login").await
    }

    /// Register, then refresh identity.
    ///
    /// # Errors
    ///
    /// The register call or the follow-up identity fetch failed; the message
    /// is also stored in [`SessionState::error`].
    pub async fn register(&self, data: &RegisterData) -> Result<SessionUser, ApiError> {
        self.begin_action().await;
        let result = match self.api.register(data).await {
            Ok(()) => self.fetch_user().await,
            Err(err) => Err(err),
        };
        self.finish_action(result, "register").await
    }

    /// Tell the server, then clear the local session and credential
    /// regardless of the server's answer.
    pub async fn logout(&self) -> LogoutOutcome {
        let outcome = match self.api.logout().await {
            Ok(()) => LogoutOutcome::Confirmed,
            Err(err) => {
                tracing::warn!(error = %err, "logout request failed; clearing local session anyway");
                LogoutOutcome::ServerFailed(err)
            }
        };

        self.credentials.clear_token();
        let mut state = self.state.write().await;
        state.user = None;
        state.error = None;
        tracing::info!("session cleared");
        outcome
    }

    async fn resolve_identity(&self) -> Result<SessionUser, ApiError> {
        let response = self.api.get_me().await?;
        SessionUser::try_from_response(response)
    }

    async fn begin_action(&self) {
        let mut state = self.state.write().await;
        state.loading = true;
        state.error = None;
    }

    async fn finish_action(&self, result: Result<SessionUser, ApiError>, action: &str) -> Result<SessionUser, ApiError> {
        let mut state = self.state.write().await;
        state.loading = false;
        match &result {
            Ok(user) => tracing::info!(action, user_id = user.id, "session action succeeded"),
            Err(err) => {
                tracing::warn!(action, error = %err, "session action failed");
                state.error = Some(err.user_message());
            }
        }
        result
    }
}
