//! HTTP handlers and route configuration.

mod categories;
mod health;
mod multipart;
mod posts;
mod search;

#[cfg(test)]
mod tests;

use actix_web::{error, web};

use crate::middleware::error::AppError;

/// Extractor settings that render rejected input as the response envelope:
/// malformed JSON and query strings are 400, a malformed path id is 404.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let message = match &err {
            error::JsonPayloadError::ContentType => "Expected a JSON body".to_string(),
            other => format!("Invalid JSON body: {}", other),
        };
        AppError::BadRequest(message).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid query string: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|_err, _req| {
        AppError::NotFound("Resource not found".to_string()).into()
    }));
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/categories")
                    .route("", web::post().to(categories::create))
                    .route("/search", web::post().to(categories::search))
                    .route("/list", web::get().to(categories::list))
                    .route("/{id}", web::put().to(categories::update))
                    .route("/{id}", web::delete().to(categories::delete)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::post().to(posts::create))
                    .route("/search", web::post().to(posts::search))
                    .route("/public/search", web::post().to(posts::public_search))
                    .route("/public/view/{id}", web::get().to(posts::public_view))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete)),
            ),
    );
}
