//! Home listing, post pages and comments.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use validator::Validate;

use inkwell_core::services::PAGE_SIZE;
use inkwell_shared::MessageResponse;
use inkwell_shared::dto::{
    CommentMessageResponse, CommentRequest, HomeQuery, HomeResponse, PostDetailResponse,
    PostMessageResponse,
};

use super::form::FormData;
use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /home?page=N
pub async fn home(
    state: web::Data<AppState>,
    query: web::Query<HomeQuery>,
) -> AppResult<HttpResponse> {
    let page = query.page.unwrap_or(1).max(1);
    let posts = state.content.list_posts(page, PAGE_SIZE).await?;

    Ok(HttpResponse::Ok().json(HomeResponse {
        page,
        posts: views::api_posts(&posts),
    }))
}

/// POST /news
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let mut form = FormData::read(payload).await?;
    let title = form.required("title")?.to_string();
    let content = form.required("content")?.to_string();
    let picture = form.take_file("picture");

    let post = state
        .content
        .create_post(&identity.principal(), &title, &content, picture)
        .await?;

    Ok(HttpResponse::Created().json(PostMessageResponse {
        message: "Your post has been created!".to_string(),
        post: views::api_post(&post),
    }))
}

/// GET /news/{id}
pub async fn show(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let post = state.content.get_post(id).await?;
    let comments = state.content.list_comments(id).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: views::api_post(&post),
        comments: comments.iter().map(views::comment_response).collect(),
    }))
}

/// POST /news/{id}/update
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i32>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let mut form = FormData::read(payload).await?;
    let title = form.required("title")?.to_string();
    let content = form.required("content")?.to_string();
    let picture = form.take_file("picture");

    let post = state
        .content
        .update_post(&identity.principal(), path.into_inner(), &title, &content, picture)
        .await?;

    Ok(HttpResponse::Ok().json(PostMessageResponse {
        message: "Your post has been updated!".to_string(),
        post: views::api_post(&post),
    }))
}

/// POST /news/{id}/delete
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    state
        .content
        .delete_post(&identity.principal(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Your post has been deleted!")))
}

/// POST /news/{id}/comments
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i32>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let comment = state
        .content
        .add_comment(&identity.principal(), path.into_inner(), &req.body)
        .await?;

    Ok(HttpResponse::Created().json(CommentMessageResponse {
        message: "Your comment has been published.".to_string(),
        comment: views::comment_response(&comment),
    }))
}

/// DELETE /comments/{id}
pub async fn delete_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    state
        .content
        .delete_comment(&identity.principal(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("The comment has been deleted.")))
}
