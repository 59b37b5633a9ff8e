//! Data Transfer Objects - request/response types for the API.
//!
//! Request types derive [`Validate`]; handlers call `validate()` before the
//! values reach a service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUserRequest {
    #[validate(length(min = 2, max = 20, message = "Username must be 2 to 20 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Keep the session for the long "remember me" lifetime.
    #[serde(default)]
    pub remember: bool,
}

/// A user's profile as shown to themselves and to admins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub image_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about_me: Option<String>,
    pub last_seen: DateTime<Utc>,
    pub role: String,
}

/// Issued after a successful login. The token is also set as the `session` cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Result of a registration or account update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub message: String,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Posts (JSON API)
// ---------------------------------------------------------------------------

/// A post in the JSON API's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiPost {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub date_posted: DateTime<Utc>,
    pub user_id: i32,
    pub image_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsResponse {
    pub posts: Vec<ApiPost>,
}

/// `GET /posts/{id}` wraps the post under a `user` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinglePostResponse {
    pub user: ApiPost,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1 to 100 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    pub user_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1 to 100 characters"))]
    pub title_change: String,
}

// ---------------------------------------------------------------------------
// Site surface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HomeQuery {
    pub page: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeResponse {
    pub page: u64,
    pub posts: Vec<ApiPost>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 100, message = "Comment must be 1 to 100 characters"))]
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i32,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub post_id: i32,
    pub user_id: i32,
}

/// A post page: the post and its comments, oldest comment first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: ApiPost,
    pub comments: Vec<CommentResponse>,
}

/// A mutation result carrying the affected post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMessageResponse {
    pub message: String,
    pub post: ApiPost,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentMessageResponse {
    pub message: String,
    pub comment: CommentResponse,
}

// ---------------------------------------------------------------------------
// Administration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 20, message = "Username must be 2 to 20 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// `admin`, `moderator` or `user`; defaults to `user`.
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 20, message = "Username must be 2 to 20 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 140, message = "About me must be at most 140 characters"))]
    pub about_me: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str, confirm: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_register_request_rules() {
        assert!(register("alice", "alice@example.com", "pw", "pw").validate().is_ok());

        let errors = register("a", "nope", "pw", "other").validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("confirm_password"));
        assert!(!fields.contains_key("password"));
    }

    #[test]
    fn test_login_remember_defaults_to_false() {
        let login: LoginRequest =
            serde_json::from_str(r#"{"email":"a@example.com","password":"pw"}"#).unwrap();
        assert!(!login.remember);
    }

    #[test]
    fn test_update_user_request_skips_absent_fields() {
        assert!(UpdateUserRequest::default().validate().is_ok());

        let request = UpdateUserRequest {
            about_me: Some("x".repeat(141)),
            ..Default::default()
        };
        assert!(request.validate().unwrap_err().field_errors().contains_key("about_me"));
    }

    #[test]
    fn test_single_post_is_wrapped_under_user_key() {
        let body = SinglePostResponse {
            user: ApiPost {
                id: 1,
                title: "T".to_string(),
                content: "C".to_string(),
                date_posted: Utc::now(),
                user_id: 1,
                image_file: "news_default.png".to_string(),
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["user"]["title"], "T");
        assert_eq!(json["user"]["user_id"], 1);
    }
}
