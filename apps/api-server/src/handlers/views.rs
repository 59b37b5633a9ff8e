//! Domain values rendered into wire types.

use inkwell_core::domain::{Comment, Post, User};
use inkwell_shared::dto::{ApiPost, CommentResponse, UserResponse};

pub fn api_post(post: &Post) -> ApiPost {
    ApiPost {
        id: post.id,
        title: post.title.clone(),
        content: post.content.clone(),
        date_posted: post.date_posted,
        user_id: post.author_id,
        image_file: post.image_file.clone(),
    }
}

pub fn api_posts(posts: &[Post]) -> Vec<ApiPost> {
    posts.iter().map(api_post).collect()
}

pub fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        image_file: user.image_file.clone(),
        about_me: user.about_me.clone(),
        last_seen: user.last_seen,
        role: user.role.to_string(),
    }
}

pub fn comment_response(comment: &Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        body: comment.body.clone(),
        timestamp: comment.timestamp,
        post_id: comment.post_id,
        user_id: comment.author_id,
    }
}
