//! Retention analytics handlers.

use actix_web::{web, HttpRequest, HttpResponse};
use log::info;

use crate::constants::{
    ERR_ONLY_ADMINS_ANALYTICS, ERR_ONLY_STAFF_STATS, MSG_RETENTION_CALCULATED, MSG_RETENTION_DATA,
};
use crate::errors::ApiError;
use crate::middleware::{require_admin, require_auth, require_staff};
use crate::models::{ApiResponse, RetentionAnalyticsResponse};
use crate::services::AnalyticsService;

/// Stored retention snapshots, newest first (admins and managers)
#[utoipa::path(
    get,
    path = "/api/analytics/retention",
    tag = "Analytics",
    responses(
        (status = 200, description = "Retention history", body = [RetentionAnalyticsResponse]),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 403, description = "Caller is not staff", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_retention_data(
    analytics_service: web::Data<AnalyticsService>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_staff(&claims, ERR_ONLY_STAFF_STATS)?;

    let history: Vec<RetentionAnalyticsResponse> = analytics_service
        .get_retention_data()
        .await?
        .into_iter()
        .map(RetentionAnalyticsResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_RETENTION_DATA, history)))
}

/// Compute and store a retention snapshot now (admin only)
#[utoipa::path(
    post,
    path = "/api/analytics/retention",
    tag = "Analytics",
    responses(
        (status = 201, description = "Snapshot stored", body = RetentionAnalyticsResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn calculate_retention(
    analytics_service: web::Data<AnalyticsService>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims, ERR_ONLY_ADMINS_ANALYTICS)?;

    let snapshot = analytics_service.calculate_retention_metrics().await?;
    info!("Admin {} triggered a retention snapshot", claims.sub);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        MSG_RETENTION_CALCULATED,
        RetentionAnalyticsResponse::from(snapshot),
    )))
}
