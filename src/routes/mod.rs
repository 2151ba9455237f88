use actix_cors::Cors;
use actix_governor::Governor;
use actix_web::{web, HttpResponse};
use utoipa::OpenApi;

use crate::config::CONFIG;
use crate::handlers;
use crate::middleware::{AuthMiddleware, AuthRateLimiterConfig};
use crate::models::HealthResponse;
use crate::openapi::ApiDoc;
use crate::services::TokenBlacklist;

pub fn configure_routes(
    cfg: &mut web::ServiceConfig,
    blacklist: &TokenBlacklist,
    auth_rate_limiter: &AuthRateLimiterConfig,
) {
    let auth = || AuthMiddleware::new(blacklist.clone());

    cfg.service(
        web::scope("/api")
            // Any origin, method and header, credentials included.
            .wrap(Cors::permissive())
            .route("/health", web::get().to(health_check))
            .route("/openapi.json", web::get().to(openapi_spec))
            // Auth routes (public, rate limited per client IP)
            .service(
                web::scope("/auth")
                    .wrap(Governor::new(auth_rate_limiter))
                    .route("/register", web::post().to(handlers::register))
                    .route("/login", web::post().to(handlers::login))
                    .route(
                        "/verify-email/{user_id}/{token}",
                        web::get().to(handlers::verify_email),
                    )
                    .route(
                        "/accept-invitation",
                        web::post().to(handlers::accept_invitation),
                    )
                    .service(
                        web::resource("/logout")
                            .wrap(auth())
                            .route(web::post().to(handlers::logout)),
                    ),
            )
            // User routes (protected). Fixed segments come before /{id}.
            .service(
                web::scope("/users")
                    .wrap(auth())
                    .route("/me", web::get().to(handlers::get_current_user))
                    .route("/search", web::get().to(handlers::search_users))
                    .route("/invite", web::post().to(handlers::invite_user))
                    .route("", web::get().to(handlers::get_users))
                    .route("/{id}", web::get().to(handlers::get_user))
                    .route("/{id}", web::put().to(handlers::update_user))
                    .route("/{id}", web::delete().to(handlers::delete_user))
                    .route("/{id}/password", web::patch().to(handlers::change_password))
                    .route("/{id}/role", web::patch().to(handlers::update_role))
                    .route("/{id}/lock", web::post().to(handlers::lock_user))
                    .route("/{id}/unlock", web::post().to(handlers::unlock_user))
                    .route(
                        "/{id}/reset-password",
                        web::patch().to(handlers::reset_password),
                    )
                    .route(
                        "/{id}/professional-status",
                        web::patch().to(handlers::update_professional_status),
                    ),
            )
            .service(
                web::scope("/admin")
                    .wrap(auth())
                    .route("/stats", web::get().to(handlers::get_user_stats)),
            )
            .service(
                web::scope("/analytics")
                    .wrap(auth())
                    .route("/retention", web::get().to(handlers::get_retention_data))
                    .route("/retention", web::post().to(handlers::calculate_retention)),
            ),
    );
}

/// Health check
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Server is running", body = HealthResponse)
    )
)]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "OK".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storage: CONFIG.storage_backend.as_str().to_string(),
    })
}

async fn openapi_spec() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
