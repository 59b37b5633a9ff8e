//! The logged-in user's own profile.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};

use inkwell_core::services::AccountUpdate;
use inkwell_shared::FieldError;
use inkwell_shared::dto::AccountResponse;

use super::form::FormData;
use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /account
pub async fn show(identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(views::user_response(&identity.0))
}

/// POST /account
///
/// Multipart fields: `username`, `email`, `about_me`, `old_pass`, `new_pass`,
/// `confirm_pass` and an optional `picture`. Blank `username`/`email` keep the
/// current values.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let mut form = FormData::read(payload).await?;
    let principal = identity.principal();
    let user = identity.0;

    let new_password = form.text("new_pass").map(str::to_string);
    if new_password.as_deref() != form.text("confirm_pass") {
        return Err(AppError::Validation(vec![FieldError {
            field: "confirm_pass".to_string(),
            message: "Passwords must match".to_string(),
        }]));
    }

    let update = AccountUpdate {
        username: form.text("username").unwrap_or(&user.username).to_string(),
        email: form.text("email").unwrap_or(&user.email).to_string(),
        about_me: form.text("about_me").map(str::to_string),
        picture: form.take_file("picture"),
        old_password: form.text("old_pass").map(str::to_string),
        new_password,
    };

    let outcome = state
        .credentials
        .update_account(&principal, &user, update)
        .await?;

    let message = if outcome.password_rejected {
        "Old password is wrong!"
    } else {
        "Your account has been updated!"
    };

    Ok(HttpResponse::Ok().json(AccountResponse {
        message: message.to_string(),
        user: views::user_response(&outcome.user),
    }))
}
