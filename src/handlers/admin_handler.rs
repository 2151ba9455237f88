//! Privileged handlers: roles, account locks, password resets, professional status and
//! statistics.

use actix_web::{web, HttpRequest, HttpResponse};
use log::{info, warn};
use validator::Validate;

use crate::constants::{
    CODE_ADMIN_REQUIRED, CODE_VALIDATION_FAILED, ERR_CANNOT_LOCK_SELF, ERR_INVALID_ROLE,
    ERR_ONLY_ADMINS_LOCK, ERR_ONLY_ADMINS_RESET_PASSWORD, ERR_ONLY_ADMINS_ROLES,
    ERR_ONLY_STAFF_PROFESSIONAL, ERR_ONLY_STAFF_STATS, MSG_PASSWORD_RESET,
    MSG_PROFESSIONAL_STATUS_UPDATED, MSG_ROLE_UPDATED, MSG_USER_LOCKED, MSG_USER_STATISTICS,
    MSG_USER_UNLOCKED,
};
use crate::errors::ApiError;
use crate::middleware::{prevent_self_action, require_admin, require_auth, require_staff};
use crate::models::{
    ApiResponse, ResetPasswordRequest, Role, UpdateProfessionalStatusRequest, UpdateRoleRequest,
    UserResponse,
};
use crate::services::UserService;
use crate::validators::parse_user_id;

/// Update a user's role (admin only)
///
/// Every denied attempt is logged with the caller and the target. Admins
/// cannot demote themselves.
#[utoipa::path(
    patch,
    path = "/api/users/{id}/role",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role updated successfully", body = UserResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_role(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    body: web::Json<UpdateRoleRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    let target = parse_user_id(&path)?;

    if !claims.is_admin() {
        warn!(
            "Denied role change: user {} (role {}) attempted to set role of user {} to '{}'",
            claims.sub, claims.role, target, body.role
        );
        return Err(ApiError::forbidden(CODE_ADMIN_REQUIRED, ERR_ONLY_ADMINS_ROLES));
    }

    body.validate()?;
    let role: Role = body.role.parse().map_err(|_| {
        ApiError::validation(CODE_VALIDATION_FAILED, vec![ERR_INVALID_ROLE.to_string()])
    })?;

    let actor = claims.user_id()?;
    let user_response: UserResponse = user_service
        .update_role(actor, target, role)
        .await?
        .into();

    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_ROLE_UPDATED, user_response)))
}

/// Lock a user account (admin only)
#[utoipa::path(
    post,
    path = "/api/users/{id}/lock",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Account locked", body = UserResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 403, description = "Caller is not an administrator, or targets themselves", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn lock_user(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims, ERR_ONLY_ADMINS_LOCK)?;
    let target = parse_user_id(&path)?;
    prevent_self_action(&claims, &target.to_hex(), ERR_CANNOT_LOCK_SELF)?;

    let user_response: UserResponse = user_service.lock_user(target).await?.into();
    info!("Admin {} locked account {}", claims.sub, target);

    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_USER_LOCKED, user_response)))
}

/// Unlock a user account and reset its failed-login counter (admin only)
#[utoipa::path(
    post,
    path = "/api/users/{id}/unlock",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Account unlocked", body = UserResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn unlock_user(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims, ERR_ONLY_ADMINS_LOCK)?;
    let target = parse_user_id(&path)?;

    let user_response: UserResponse = user_service.unlock_user(target).await?.into();
    info!("Admin {} unlocked account {}", claims.sub, target);

    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_USER_UNLOCKED, user_response)))
}

/// Set a new password for a user and clear any lockout (admin only)
#[utoipa::path(
    patch,
    path = "/api/users/{id}/reset-password",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset, account unlocked", body = UserResponse),
        (status = 400, description = "Weak password", body = crate::models::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 403, description = "Caller is not an administrator", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn reset_password(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    body: web::Json<ResetPasswordRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_admin(&claims, ERR_ONLY_ADMINS_RESET_PASSWORD)?;
    body.validate()?;
    let target = parse_user_id(&path)?;

    let user_response: UserResponse = user_service
        .reset_password(target, &body.new_password)
        .await?
        .into();
    info!("Admin {} reset the password of user {}", claims.sub, target);

    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_PASSWORD_RESET, user_response)))
}

/// Set or clear the professional flag (admins and managers)
#[utoipa::path(
    patch,
    path = "/api/users/{id}/professional-status",
    tag = "Admin",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateProfessionalStatusRequest,
    responses(
        (status = 200, description = "Professional status updated", body = UserResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 403, description = "Caller is not staff", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_professional_status(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    body: web::Json<UpdateProfessionalStatusRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_staff(&claims, ERR_ONLY_STAFF_PROFESSIONAL)?;
    let target = parse_user_id(&path)?;

    let user_response: UserResponse = user_service
        .update_professional_status(target, body.is_professional)
        .await?
        .into();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_PROFESSIONAL_STATUS_UPDATED,
        user_response,
    )))
}

/// Get user statistics (admins and managers)
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    tag = "Admin",
    responses(
        (status = 200, description = "User statistics", body = crate::models::UserStats),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 403, description = "Caller is not staff", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user_stats(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_staff(&claims, ERR_ONLY_STAFF_STATS)?;

    let stats = user_service.get_stats().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_USER_STATISTICS, stats)))
}
