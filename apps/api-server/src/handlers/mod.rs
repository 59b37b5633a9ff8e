//! HTTP handlers and route configuration.

mod account;
mod admin;
mod api;
mod auth;
mod form;
mod health;
mod news;
mod views;


use actix_web::web;

use crate::middleware::error::AppError;

/// Malformed JSON bodies and query strings become 400 problem documents.
fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    );
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    extractor_config(cfg);

    cfg.route("/api/health", web::get().to(health::health_check))
        // JSON post API
        .route("/posts", web::get().to(api::list_posts))
        .route("/post", web::post().to(api::create_post))
        .service(
            web::resource("/posts/{id}")
                .route(web::get().to(api::get_post))
                .route(web::put().to(api::update_post))
                .route(web::delete().to(api::delete_post)),
        )
        // Accounts
        .route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .route("/logout", web::post().to(auth::logout))
        .service(
            web::resource("/account")
                .route(web::get().to(account::show))
                .route(web::post().to(account::update)),
        )
        // Site pages
        .route("/", web::get().to(news::home))
        .route("/home", web::get().to(news::home))
        .route("/news", web::post().to(news::create))
        .route("/news/{id}", web::get().to(news::show))
        .route("/news/{id}/update", web::post().to(news::update))
        .route("/news/{id}/delete", web::post().to(news::delete))
        .route("/news/{id}/comments", web::post().to(news::add_comment))
        .route("/comments/{id}", web::delete().to(news::delete_comment))
        // Administration
        .service(
            web::scope("/admin")
                .service(
                    web::resource("/users")
                        .route(web::get().to(admin::list_users))
                        .route(web::post().to(admin::create_user)),
                )
                .service(
                    web::resource("/users/{id}")
                        .route(web::put().to(admin::update_user))
                        .route(web::delete().to(admin::delete_user)),
                ),
        );
}
