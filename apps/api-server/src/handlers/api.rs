//! JSON post API.
//!
//! A missing post is reported as `{"message": "No post was found!"}` with status
//! 200, which clients of this API rely on.

use actix_web::{HttpResponse, web};
use validator::Validate;

use inkwell_core::DomainError;
use inkwell_core::policy::Principal;
use inkwell_shared::MessageResponse;
use inkwell_shared::dto::{CreatePostRequest, PostsResponse, SinglePostResponse, UpdatePostRequest};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const NO_POST: &str = "No post was found!";

/// `NotFound` becomes the 200 "no post" body; other errors pass through.
fn or_no_post(result: Result<HttpResponse, DomainError>) -> AppResult<HttpResponse> {
    match result {
        Err(DomainError::NotFound { .. }) => {
            Ok(HttpResponse::Ok().json(MessageResponse::new(NO_POST)))
        }
        other => other.map_err(AppError::from),
    }
}

/// GET /posts
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.content.list_all_posts().await?;

    Ok(HttpResponse::Ok().json(PostsResponse {
        posts: views::api_posts(&posts),
    }))
}

/// GET /posts/{id}
pub async fn get_post(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    or_no_post(state.content.get_post(id).await.map(|post| {
        HttpResponse::Ok().json(SinglePostResponse {
            user: views::api_post(&post),
        })
    }))
}

/// POST /post
///
/// Creates the post on behalf of `user_id`, which must name an existing user.
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let author = state
        .users
        .find_by_id(req.user_id)
        .await
        .map_err(DomainError::from)?
        .ok_or_else(|| AppError::BadRequest(format!("No user with id {}", req.user_id)))?;

    let post = state
        .content
        .create_post(&Principal::from_user(&author), &req.title, &req.content, None)
        .await?;
    tracing::debug!(post_id = post.id, "Post created through the JSON API");

    Ok(HttpResponse::Ok().json(MessageResponse::new("New post was created!")))
}

/// PUT /posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i32>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let result = state
        .content
        .rename_post(&identity.principal(), path.into_inner(), &req.title_change)
        .await
        .map(|_| HttpResponse::Ok().json(MessageResponse::new("The post has been updated!")));
    or_no_post(result)
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let result = state
        .content
        .delete_post(&identity.principal(), path.into_inner())
        .await
        .map(|_| HttpResponse::Ok().json(MessageResponse::new("The post has been deleted!")));
    or_no_post(result)
}
