//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Each table is a `BTreeMap` keyed by a monotonically increasing id, so iteration
//! order is insertion order. Unique columns are enforced the way the database would,
//! with `RepoError::Constraint`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use inkwell_core::domain::{Comment, NewComment, NewPost, NewUser, Post, User};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{BaseRepository, CommentRepository, PostRepository, UserRepository};

struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn get(&self, id: i32) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn replace(&mut self, id: i32, row: T) -> Result<T, RepoError> {
        match self.rows.get_mut(&id) {
            Some(slot) => {
                *slot = row.clone();
                Ok(row)
            }
            None => Err(RepoError::NotFound),
        }
    }

    fn remove(&mut self, id: i32) -> Result<(), RepoError> {
        self.rows.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

/// In-memory user table with unique username and email.
#[derive(Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_unique(
    table: &Table<User>,
    id: Option<i32>,
    username: &str,
    email: &str,
) -> Result<(), RepoError> {
    let clash = table
        .rows
        .values()
        .filter(|u| Some(u.id) != id)
        .any(|u| u.username == username || u.email == email);

    if clash {
        Err(RepoError::Constraint("Entity already exists".to_string()))
    } else {
        Ok(())
    }
}

#[async_trait]
impl BaseRepository<User, NewUser, i32> for InMemoryUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
        Ok(self.table.read().await.get(id))
    }

    async fn insert(&self, new: NewUser) -> Result<User, RepoError> {
        let mut table = self.table.write().await;
        check_unique(&table, None, &new.username, &new.email)?;

        let user = User {
            id: table.next_id(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            image_file: new.image_file,
            about_me: new.about_me,
            last_seen: new.last_seen,
            role: new.role,
        };
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut table = self.table.write().await;
        check_unique(&table, Some(user.id), &user.username, &user.email)?;
        table.replace(user.id, user)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        self.table.write().await.remove(id)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.username == username).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn touch_last_seen(&self, id: i32, at: DateTime<Utc>) -> Result<(), RepoError> {
        let mut table = self.table.write().await;
        if let Some(user) = table.rows.get_mut(&id) {
            user.last_seen = at;
        }
        Ok(())
    }
}

/// In-memory post table.
#[derive(Default)]
pub struct InMemoryPostRepository {
    table: RwLock<Table<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn newest_first(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self.table.read().await.rows.values().cloned().collect();
        posts.sort_by(|a, b| {
            b.date_posted
                .cmp(&a.date_posted)
                .then_with(|| b.id.cmp(&a.id))
        });
        posts
    }
}

#[async_trait]
impl BaseRepository<Post, NewPost, i32> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.table.read().await.get(id))
    }

    async fn insert(&self, new: NewPost) -> Result<Post, RepoError> {
        let mut table = self.table.write().await;
        let post = Post {
            id: table.next_id(),
            title: new.title,
            content: new.content,
            date_posted: new.date_posted,
            author_id: new.author_id,
            image_file: new.image_file,
        };
        table.rows.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        self.table.write().await.replace(post.id, post)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        self.table.write().await.remove(id)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_recent(&self, offset: u64, limit: u64) -> Result<Vec<Post>, RepoError> {
        let posts = self.newest_first().await;
        Ok(posts
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.newest_first().await)
    }
}

/// In-memory comment table.
#[derive(Default)]
pub struct InMemoryCommentRepository {
    table: RwLock<Table<Comment>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Comment, NewComment, i32> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Comment>, RepoError> {
        Ok(self.table.read().await.get(id))
    }

    async fn insert(&self, new: NewComment) -> Result<Comment, RepoError> {
        let mut table = self.table.write().await;
        let comment = Comment {
            id: table.next_id(),
            body: new.body,
            timestamp: new.timestamp,
            post_id: new.post_id,
            author_id: new.author_id,
        };
        table.rows.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        self.table.write().await.replace(comment.id, comment)
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        self.table.write().await.remove(id)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_by_post(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn delete_by_post(&self, post_id: i32) -> Result<u64, RepoError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|_, c| c.post_id != post_id);
        Ok((before - table.rows.len()) as u64)
    }
}
