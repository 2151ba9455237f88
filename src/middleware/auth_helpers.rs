//! Authentication and authorization helper functions.
//!
//! These helpers reduce boilerplate in handlers by providing common patterns for:
//! - Extracting claims from authenticated requests
//! - Requiring admin or staff privileges
//! - Checking resource access permissions
//! - Preventing self-targeted actions

use actix_web::HttpRequest;
use log::warn;

use crate::constants::{
    CODE_ADMIN_REQUIRED, CODE_AUTH_REQUIRED, CODE_FORBIDDEN, CODE_SELF_ACTION_FORBIDDEN,
    ERR_AUTH_REQUIRED,
};
use crate::errors::ApiError;
use crate::models::Claims;

use super::RequestExt;

/// Extract claims from request or return Unauthorized error.
///
/// # Example
/// ```ignore
/// let claims = require_auth(&req)?;
/// ```
pub fn require_auth(req: &HttpRequest) -> Result<Claims, ApiError> {
    req.get_claims().ok_or_else(|| {
        warn!("Failed to get claims from request");
        ApiError::unauthorized(CODE_AUTH_REQUIRED, ERR_AUTH_REQUIRED)
    })
}

/// Require the ADMIN role. Denials are logged with the caller's id and role.
///
/// # Example
/// ```ignore
/// let claims = require_auth(&req)?;
/// require_admin(&claims, ERR_ONLY_ADMINS_LOCK)?;
/// ```
pub fn require_admin(claims: &Claims, action_msg: &str) -> Result<(), ApiError> {
    if !claims.is_admin() {
        warn!(
            "Denied admin action for user {} (role {}): {}",
            claims.sub, claims.role, action_msg
        );
        return Err(ApiError::forbidden(CODE_ADMIN_REQUIRED, action_msg));
    }
    Ok(())
}

/// Require ADMIN or MANAGER.
pub fn require_staff(claims: &Claims, action_msg: &str) -> Result<(), ApiError> {
    if !claims.is_staff() {
        warn!(
            "Denied staff action for user {} (role {}): {}",
            claims.sub, claims.role, action_msg
        );
        return Err(ApiError::forbidden(CODE_FORBIDDEN, action_msg));
    }
    Ok(())
}

/// Owner or admin.
pub fn require_access(
    claims: &Claims,
    target_user_id: &str,
    permission_msg: &str,
) -> Result<(), ApiError> {
    if !claims.can_access(target_user_id) {
        warn!(
            "User {} (role: {}) attempted to access resource of user {}",
            claims.sub, claims.role, target_user_id
        );
        return Err(ApiError::forbidden(CODE_FORBIDDEN, permission_msg));
    }
    Ok(())
}

/// Owner, admin or manager. Used for read access to profiles.
pub fn require_owner_or_staff(
    claims: &Claims,
    target_user_id: &str,
    permission_msg: &str,
) -> Result<(), ApiError> {
    if !(claims.is_staff() || claims.is_user(target_user_id)) {
        warn!(
            "User {} (role: {}) attempted to view user {}",
            claims.sub, claims.role, target_user_id
        );
        return Err(ApiError::forbidden(CODE_FORBIDDEN, permission_msg));
    }
    Ok(())
}

/// Prevent self-targeted actions (e.g., admin locking themselves out).
pub fn prevent_self_action(
    claims: &Claims,
    target_user_id: &str,
    self_action_msg: &str,
) -> Result<(), ApiError> {
    if claims.sub == target_user_id {
        warn!(
            "User {} attempted self-targeted action: {}",
            claims.sub, self_action_msg
        );
        return Err(ApiError::forbidden(CODE_SELF_ACTION_FORBIDDEN, self_action_msg));
    }
    Ok(())
}
