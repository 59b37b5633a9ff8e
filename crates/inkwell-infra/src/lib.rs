//! # Inkwell Infrastructure
//!
//! Concrete implementations of the ports defined in `inkwell-core`:
//! persistence, password hashing, session tokens, the session registry and
//! image storage.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No database driver, in-memory store only
//! - `postgres` - PostgreSQL database support via SeaORM

pub mod auth;
pub mod cache;
pub mod database;
pub mod media;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use cache::InMemoryCache;
pub use database::{InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository};
pub use media::{FsImageStore, MediaConfig};

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;
