use std::sync::Arc;

use crate::domain::{COMMENT_BODY_MAX_LEN, Comment, NewComment, NewPost, POST_TITLE_MAX_LEN, Post};
use crate::error::DomainError;
use crate::policy::{Action, Principal, Resource, authorize};
use crate::ports::{CommentRepository, ImageKind, ImageStore, ImageUpload, PostRepository};

use super::missing;

/// Posts shown per page on the home listing.
pub const PAGE_SIZE: u64 = 5;

/// CRUD over posts and comments.
pub struct ContentStore {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    images: Arc<dyn ImageStore>,
}

impl ContentStore {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            posts,
            comments,
            images,
        }
    }

    /// Create a post authored by `principal`.
    pub async fn create_post(
        &self,
        principal: &Principal,
        title: &str,
        content: &str,
        image: Option<ImageUpload>,
    ) -> Result<Post, DomainError> {
        authorize(principal, Action::CreatePost, Resource::Site)?;
        let author_id = principal.id().ok_or(DomainError::Unauthenticated)?;
        validate_post(title, content)?;

        let mut new_post = NewPost::new(author_id, title.to_string(), content.to_string());
        if let Some(image) = image {
            new_post.image_file = self.store_image(image).await?;
        }

        let post = self.posts.insert(new_post).await?;
        tracing::info!(post_id = post.id, author_id, "Post created");
        Ok(post)
    }

    /// One page of posts, newest first. Pages start at 1; page 0 reads as page 1.
    /// A page past the end is empty.
    pub async fn list_posts(&self, page: u64, page_size: u64) -> Result<Vec<Post>, DomainError> {
        let offset = page.saturating_sub(1).saturating_mul(page_size);
        Ok(self.posts.list_recent(offset, page_size).await?)
    }

    /// Every post, newest first.
    pub async fn list_all_posts(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list_all().await?)
    }

    pub async fn get_post(&self, id: i32) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Post", id))
    }

    /// Overwrite title and content; the image changes only when a new one is given.
    pub async fn update_post(
        &self,
        principal: &Principal,
        id: i32,
        title: &str,
        content: &str,
        image: Option<ImageUpload>,
    ) -> Result<Post, DomainError> {
        authorize(principal, Action::EditPost, Resource::Post { id })?;
        validate_post(title, content)?;

        let mut post = self.get_post(id).await?;
        post.title = title.to_string();
        post.content = content.to_string();
        if let Some(image) = image {
            post.image_file = self.store_image(image).await?;
        }

        let post = self.posts.update(post).await.map_err(missing("Post", id))?;
        tracing::info!(post_id = id, "Post updated");
        Ok(post)
    }

    /// Change only the title of a post.
    pub async fn rename_post(
        &self,
        principal: &Principal,
        id: i32,
        title: &str,
    ) -> Result<Post, DomainError> {
        authorize(principal, Action::EditPost, Resource::Post { id })?;
        validate_title(title)?;

        let mut post = self.get_post(id).await?;
        post.title = title.to_string();

        let post = self.posts.update(post).await.map_err(missing("Post", id))?;
        tracing::info!(post_id = id, "Post renamed");
        Ok(post)
    }

    /// Delete a post together with its comments.
    pub async fn delete_post(&self, principal: &Principal, id: i32) -> Result<(), DomainError> {
        authorize(principal, Action::DeletePost, Resource::Post { id })?;

        self.get_post(id).await?;
        let removed = self.comments.delete_by_post(id).await?;
        self.posts.delete(id).await.map_err(missing("Post", id))?;

        tracing::info!(post_id = id, comments_removed = removed, "Post deleted");
        Ok(())
    }

    pub async fn add_comment(
        &self,
        principal: &Principal,
        post_id: i32,
        body: &str,
    ) -> Result<Comment, DomainError> {
        authorize(principal, Action::CreateComment, Resource::Post { id: post_id })?;
        let author_id = principal.id().ok_or(DomainError::Unauthenticated)?;

        let body = body.trim();
        if body.is_empty() {
            return Err(DomainError::Validation("Comment must not be empty".to_string()));
        }
        if body.chars().count() > COMMENT_BODY_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "Comment must be at most {COMMENT_BODY_MAX_LEN} characters long"
            )));
        }

        self.get_post(post_id).await?;
        let comment = self
            .comments
            .insert(NewComment::new(post_id, author_id, body.to_string()))
            .await?;

        tracing::info!(comment_id = comment.id, post_id, author_id, "Comment added");
        Ok(comment)
    }

    /// Comments of a post in the order they were written.
    pub async fn list_comments(&self, post_id: i32) -> Result<Vec<Comment>, DomainError> {
        Ok(self.comments.list_by_post(post_id).await?)
    }

    pub async fn get_comment(&self, id: i32) -> Result<Comment, DomainError> {
        self.comments
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Comment", id))
    }

    pub async fn delete_comment(&self, principal: &Principal, id: i32) -> Result<(), DomainError> {
        // Anonymous callers are turned away before the lookup.
        if !principal.is_authenticated() {
            return Err(DomainError::Unauthenticated);
        }

        let comment = self.get_comment(id).await?;
        authorize(
            principal,
            Action::DeleteComment,
            Resource::Comment {
                id,
                author_id: comment.author_id,
            },
        )?;

        self.comments.delete(id).await.map_err(missing("Comment", id))?;
        tracing::info!(comment_id = id, post_id = comment.post_id, "Comment deleted");
        Ok(())
    }

    async fn store_image(&self, image: ImageUpload) -> Result<String, DomainError> {
        Ok(self.images.store(ImageKind::PostImage, "", image).await?)
    }
}

fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::Validation("Title must not be empty".to_string()));
    }
    if title.chars().count() > POST_TITLE_MAX_LEN {
        return Err(DomainError::Validation(format!(
            "Title must be at most {POST_TITLE_MAX_LEN} characters long"
        )));
    }
    Ok(())
}

fn validate_post(title: &str, content: &str) -> Result<(), DomainError> {
    validate_title(title)?;
    if content.trim().is_empty() {
        return Err(DomainError::Validation("Content must not be empty".to_string()));
    }
    Ok(())
}
