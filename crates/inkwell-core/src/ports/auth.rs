//! Authentication ports.

use crate::domain::PasswordHash;

/// Claims carried by a session token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: i32,
    pub email: String,
    /// Identifier of the server-side session entry backing this token.
    pub session_id: String,
    pub exp: i64,
}

/// A freshly signed session token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub session_id: String,
    pub expires_in: i64,
}

/// Token service trait for signed session tokens.
pub trait TokenService: Send + Sync {
    /// Issue a token for a user that expires after `ttl_seconds`.
    fn issue_token(
        &self,
        user_id: i32,
        email: &str,
        ttl_seconds: i64,
    ) -> Result<IssuedToken, AuthError>;

    /// Validate signature, issuer and expiry, and decode the claims.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password with a fresh salt.
    fn hash(&self, password: &str) -> Result<PasswordHash, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Hashing error: {0}")]
    HashingError(String),
}

impl From<AuthError> for crate::DomainError {
    fn from(err: AuthError) -> Self {
        crate::DomainError::Internal(err.to_string())
    }
}
