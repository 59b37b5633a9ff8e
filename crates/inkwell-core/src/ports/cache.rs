//! Key-value store with expiry. Backs the session registry.

use async_trait::async_trait;
use std::time::Duration;

/// Expiring key-value store.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get a live value.
    async fn get(&self, key: &str) -> Option<String>;

    /// Set a value, expiring after `ttl` when given.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Delete a key. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Cache operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}
