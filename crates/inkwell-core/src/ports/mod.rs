//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod cache;
mod media;
mod repository;

pub use auth::{AuthError, IssuedToken, PasswordService, TokenClaims, TokenService};
pub use cache::{Cache, CacheError};
pub use media::{ImageError, ImageKind, ImageStore, ImageUpload};
pub use repository::{BaseRepository, CommentRepository, PostRepository, UserRepository};
