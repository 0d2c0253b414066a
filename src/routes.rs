//! Route configuration
//!
//! Centralized route setup extracted from main.rs

use actix_web::web;

use crate::handlers;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(handlers::health_check))
            .service(
                web::scope("/auth")
                    .route("/forgot-password", web::post().to(handlers::forgot_password))
                    .route("/reset-password", web::post().to(handlers::reset_password)),
            )
            .service(
                web::scope("/captcha")
                    .route("/generate", web::post().to(handlers::generate_captcha))
                    .route("/verify", web::post().to(handlers::verify_captcha)),
            )
            .service(
                web::scope("/users")
                    .route("/register", web::post().to(handlers::register))
                    .route("/check-alias/{alias}", web::get().to(handlers::check_alias)),
            ),
    );
}
