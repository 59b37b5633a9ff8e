use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Comment, NewComment, NewPost, NewUser, Post, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
///
/// `N` is the not-yet-persisted form of `T`; the store assigns ids on insert.
#[async_trait]
pub trait BaseRepository<T, N, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity and return it with its assigned id.
    async fn insert(&self, new: N) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with `NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, NewUser, i32> {
    /// Find a user by their email address (exact match).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their username (exact match).
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// All users ordered by id.
    async fn list_all(&self) -> Result<Vec<User>, RepoError>;

    /// Record activity without rewriting the rest of the row.
    async fn touch_last_seen(&self, id: i32, at: DateTime<Utc>) -> Result<(), RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, NewPost, i32> {
    /// Newest first, skipping `offset` posts and returning at most `limit`.
    async fn list_recent(&self, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError>;

    /// Every post, newest first.
    async fn list_all(&self) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, NewComment, i32> {
    /// Comments of a post in insertion order.
    async fn list_by_post(&self, post_id: i32) -> Result<Vec<Comment>, RepoError>;

    /// Remove every comment of a post; returns how many were removed.
    async fn delete_by_post(&self, post_id: i32) -> Result<u64, RepoError>;
}
