//! Registration, login and logout.

use actix_web::{HttpRequest, HttpResponse, web};
use validator::Validate;

use inkwell_shared::MessageResponse;
use inkwell_shared::dto::{AccountResponse, LoginRequest, LoginResponse, RegisterUserRequest};

use super::views;
use crate::middleware::auth::{
    OptionalIdentity, expired_session_cookie, session_cookie, session_token,
};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn already_logged_in() -> AppError {
    AppError::BadRequest("You are already logged in.".to_string())
}

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    if identity.0.is_some() {
        return Err(already_logged_in());
    }

    let req = body.into_inner();
    req.validate()?;

    let user = state
        .credentials
        .register(req.username.trim(), req.email.trim(), &req.password)
        .await?;

    Ok(HttpResponse::Created().json(AccountResponse {
        message: "Your account has been created! You are now able to log in.".to_string(),
        user: views::user_response(&user),
    }))
}

/// POST /login
pub async fn login(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    if identity.0.is_some() {
        return Err(already_logged_in());
    }

    let req = body.into_inner();
    req.validate()?;

    let session = state
        .sessions
        .login(req.email.trim(), &req.password, req.remember)
        .await?;

    // Without "remember me" the cookie lasts for the browser session only.
    let cookie_age = req.remember.then_some(state.remember_ttl);

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&session.token, cookie_age))
        .json(LoginResponse {
            message: "You have been logged in!".to_string(),
            access_token: session.token,
            token_type: "Bearer".to_string(),
            expires_in: session.expires_in,
            user: views::user_response(&session.user),
        }))
}

/// POST /logout
pub async fn logout(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    if let Some(token) = session_token(&req) {
        state.sessions.logout(&token).await;
    }

    HttpResponse::Ok()
        .cookie(expired_session_cookie())
        .json(MessageResponse::new("You have been logged out."))
}
