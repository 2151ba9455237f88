//! User management REST API: accounts with role-based access control,
//! administrator search over the user base, invitations and retention analytics.

pub mod config;
pub mod constants;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;
pub mod validators;

use std::sync::Arc;

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{web, HttpRequest};
use log::debug;

use crate::constants::{CODE_INVALID_BODY, CODE_INVALID_QUERY};
use crate::errors::ApiError;
use crate::middleware::{create_auth_rate_limiter_config, AuthRateLimiterConfig};
use crate::repositories::{RetentionRepository, UserRepository};
use crate::services::{AnalyticsService, AuthService, Mailer, TokenBlacklist, UserService};

/// Services and shared middleware state, built once and handed to every worker.
#[derive(Clone)]
pub struct AppState {
    pub user_service: web::Data<UserService>,
    pub auth_service: web::Data<AuthService>,
    pub analytics_service: web::Data<AnalyticsService>,
    pub token_blacklist: web::Data<TokenBlacklist>,
    pub auth_rate_limiter: AuthRateLimiterConfig,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        snapshots: Arc<dyn RetentionRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            user_service: web::Data::new(UserService::new(users.clone(), mailer)),
            auth_service: web::Data::new(AuthService::new(users.clone())),
            analytics_service: web::Data::new(AnalyticsService::new(users, snapshots)),
            token_blacklist: web::Data::new(TokenBlacklist::new()),
            auth_rate_limiter: create_auth_rate_limiter_config(),
        }
    }

    /// Register app data, extractor error handlers and routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.user_service.clone())
            .app_data(self.auth_service.clone())
            .app_data(self.analytics_service.clone())
            .app_data(self.token_blacklist.clone())
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler));

        routes::configure_routes(cfg, &self.token_blacklist, &self.auth_rate_limiter);
    }
}

fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected query string of {}: {}", req.path(), err);
    ApiError::validation(CODE_INVALID_QUERY, vec![err.to_string()]).into()
}

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Rejected body of {}: {}", req.path(), err);
    ApiError::validation(CODE_INVALID_BODY, vec![err.to_string()]).into()
}
