//! Authentication token lifecycle.
//!
//! A persisted token is trusted on read: `restore` never asks the server
//! whether it is still valid. An invalidated token surfaces as a 401 on the
//! next authenticated call.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::error::{AuthError, NetworkError};
use crate::models::User;
use crate::storage::{KeyValueStore, TOKEN_KEY};

/// The client's belief about whether it is logged in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Sole owner of the session token, in memory and on disk.
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    session: Session,
    user: Option<User>,
}

impl SessionManager {
    /// Read any persisted token. Its presence alone means authenticated.
    pub fn restore(store: Arc<dyn KeyValueStore>) -> Self {
        let token = match store.get(TOKEN_KEY) {
            Ok(token) => token
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored token, starting logged out");
                None
            }
        };
        tracing::info!(authenticated = token.is_some(), "session restored");
        Self {
            store,
            session: Session { token },
            user: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Known only after a login in this process.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Log in against the service and, on success, persist the new token.
    pub async fn login(
        &mut self,
        api: &ApiClient,
        username: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let result = api.login(username, password).await;
        self.complete_login(username, result)
    }

    /// Apply the outcome of a login request. Failure leaves the prior session
    /// untouched.
    pub fn complete_login(
        &mut self,
        username: &str,
        result: Result<String, NetworkError>,
    ) -> Result<(), AuthError> {
        let token = result.map_err(AuthError::InvalidCredentials)?;
        if let Err(e) = self.store.set(TOKEN_KEY, &token) {
            tracing::warn!(error = %e, "failed to persist token");
        }
        self.session.token = Some(token);
        self.user = Some(User {
            username: username.to_string(),
            email: String::new(),
        });
        tracing::info!(username, "logged in");
        Ok(())
    }

    /// Register an account. Never establishes a session.
    pub async fn signup(
        api: &ApiClient,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let result = api.signup(username, email, password).await;
        Self::complete_signup(result)
    }

    pub fn complete_signup(result: Result<(), NetworkError>) -> Result<(), AuthError> {
        result.map_err(AuthError::RegistrationFailed)
    }

    /// Drop the token from memory and disk. Never fails.
    pub fn logout(&mut self) {
        if let Err(e) = self.store.remove(TOKEN_KEY) {
            tracing::warn!(error = %e, "failed to remove stored token");
        }
        self.session.token = None;
        self.user = None;
        tracing::info!("logged out");
    }
}
