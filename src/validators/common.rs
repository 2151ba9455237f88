//! Common validation helpers.

use mongodb::bson::oid::ObjectId;

use crate::constants::{
    CODE_INVALID_USER_ID, CODE_PASSWORD_MISMATCH, CODE_SAME_PASSWORD, ERR_INVALID_USER_ID,
    ERR_PASSWORD_MISMATCH, ERR_SAME_PASSWORD,
};
use crate::errors::ApiError;

/// Parse a hex ObjectId from a path segment.
pub fn parse_user_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id).map_err(|_| ApiError::bad_request(CODE_INVALID_USER_ID, ERR_INVALID_USER_ID))
}

/// Validate that password confirmation matches the new password.
pub fn validate_password_match(new_password: &str, confirm_password: &str) -> Result<(), ApiError> {
    if new_password != confirm_password {
        return Err(ApiError::bad_request(
            CODE_PASSWORD_MISMATCH,
            ERR_PASSWORD_MISMATCH,
        ));
    }
    Ok(())
}

/// Validate that new password is different from current password.
pub fn validate_password_different(
    current_password: &str,
    new_password: &str,
) -> Result<(), ApiError> {
    if current_password == new_password {
        return Err(ApiError::bad_request(CODE_SAME_PASSWORD, ERR_SAME_PASSWORD));
    }
    Ok(())
}
