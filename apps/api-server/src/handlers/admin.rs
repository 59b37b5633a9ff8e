//! User administration (admins only).

use actix_web::{HttpResponse, web};
use validator::Validate;

use inkwell_core::domain::Role;
use inkwell_core::services::UserChanges;
use inkwell_shared::MessageResponse;
use inkwell_shared::dto::{
    AccountResponse, CreateUserRequest, UpdateUserRequest, UserListResponse,
};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn parse_role(role: Option<&str>) -> AppResult<Option<Role>> {
    Ok(role.map(str::parse::<Role>).transpose()?)
}

/// GET /admin/users
pub async fn list_users(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let users = state.admin.list_users(&identity.principal()).await?;

    Ok(HttpResponse::Ok().json(UserListResponse {
        users: users.iter().map(views::user_response).collect(),
    }))
}

/// POST /admin/users
pub async fn create_user(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;
    let role = parse_role(req.role.as_deref())?.unwrap_or_default();

    let user = state
        .admin
        .create_user(
            &identity.principal(),
            req.username.trim(),
            req.email.trim(),
            &req.password,
            role,
        )
        .await?;

    Ok(HttpResponse::Created().json(AccountResponse {
        message: format!("User {} has been created.", user.username),
        user: views::user_response(&user),
    }))
}

/// PUT /admin/users/{id}
pub async fn update_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i32>,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    req.validate()?;

    let changes = UserChanges {
        role: parse_role(req.role.as_deref())?,
        username: req.username,
        email: req.email,
        about_me: req.about_me,
    };
    let user = state
        .admin
        .update_user(&identity.principal(), path.into_inner(), changes)
        .await?;

    Ok(HttpResponse::Ok().json(AccountResponse {
        message: format!("User {} has been updated.", user.username),
        user: views::user_response(&user),
    }))
}

/// DELETE /admin/users/{id}
pub async fn delete_user(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    state
        .admin
        .delete_user(&identity.principal(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("The user has been deleted.")))
}
