use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::domain::{User, mask_email};
use crate::error::DomainError;
use crate::ports::{Cache, TokenService, UserRepository};

use super::CredentialStore;

/// Session lifetimes.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Lifetime of an ordinary login.
    pub ttl: Duration,
    /// Lifetime when the user asked to be remembered.
    pub remember_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 3600),
            remember_ttl: Duration::from_secs(30 * 24 * 3600),
        }
    }
}

/// An established session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub expires_in: i64,
}

/// Resolves the current principal of a request and tracks authentication state.
///
/// A session is a signed token plus a registry entry keyed by the token's session id.
/// Logging out removes the entry, which invalidates the token even before it expires.
pub struct SessionManager {
    credentials: Arc<CredentialStore>,
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
    sessions: Arc<dyn Cache>,
    config: SessionConfig,
}

fn session_key(session_id: &str) -> String {
    format!("session:{session_id}")
}

impl SessionManager {
    pub fn new(
        credentials: Arc<CredentialStore>,
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenService>,
        sessions: Arc<dyn Cache>,
        config: SessionConfig,
    ) -> Self {
        Self {
            credentials,
            users,
            tokens,
            sessions,
            config,
        }
    }

    /// Verify credentials and open a session bound to the user.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<Session, DomainError> {
        let user = self.credentials.verify(email, password).await?;

        let ttl = if remember {
            self.config.remember_ttl
        } else {
            self.config.ttl
        };
        let issued = self
            .tokens
            .issue_token(user.id, &user.email, ttl.as_secs() as i64)?;

        self.sessions
            .set(
                &session_key(&issued.session_id),
                &user.id.to_string(),
                Some(ttl),
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        tracing::info!(
            user_id = user.id,
            user_email = %mask_email(&user.email),
            remember,
            "User logged in"
        );

        Ok(Session {
            token: issued.token,
            user,
            expires_in: issued.expires_in,
        })
    }

    /// Destroy the session behind `token`. Never fails; unusable tokens are ignored.
    pub async fn logout(&self, token: &str) {
        let claims = match self.tokens.validate_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Logout with unusable token");
                return;
            }
        };

        match self.sessions.delete(&session_key(&claims.session_id)).await {
            Ok(()) => tracing::info!(user_id = claims.user_id, "User logged out"),
            Err(e) => tracing::warn!(error = %e, "Failed to remove session entry"),
        }
    }

    /// Resolve a token to its user, or `None` when it does not authenticate anyone.
    ///
    /// Refreshes `last_seen` on the way; failing to persist it only logs a warning.
    pub async fn resolve(&self, token: &str) -> Result<Option<User>, DomainError> {
        let claims = match self.tokens.validate_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected session token");
                return Ok(None);
            }
        };

        let bound_user = self.sessions.get(&session_key(&claims.session_id)).await;
        if bound_user.as_deref() != Some(claims.user_id.to_string().as_str()) {
            tracing::debug!(user_id = claims.user_id, "Session no longer registered");
            return Ok(None);
        }

        let Some(mut user) = self.users.find_by_id(claims.user_id).await? else {
            return Ok(None);
        };

        let now = Utc::now();
        match self.users.touch_last_seen(user.id, now).await {
            Ok(()) => user.last_seen = now,
            Err(e) => tracing::warn!(user_id = user.id, error = %e, "Failed to record last_seen"),
        }

        Ok(Some(user))
    }
}
