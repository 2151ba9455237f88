//! Error code constants for API responses.
//!
//! These codes provide a machine-readable identifier for each error type,
//! making it easier for API clients to handle errors programmatically.

// Validation errors
pub const CODE_VALIDATION_FAILED: &str = "VALIDATION_FAILED";
pub const CODE_INVALID_QUERY: &str = "INVALID_QUERY";
pub const CODE_INVALID_BODY: &str = "INVALID_BODY";

// Authentication errors
pub const CODE_AUTH_REQUIRED: &str = "AUTH_REQUIRED";
pub const CODE_INVALID_TOKEN: &str = "INVALID_TOKEN";
pub const CODE_TOKEN_REVOKED: &str = "TOKEN_REVOKED";
pub const CODE_INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
pub const CODE_ACCOUNT_LOCKED: &str = "ACCOUNT_LOCKED";
pub const CODE_EMAIL_NOT_VERIFIED: &str = "EMAIL_NOT_VERIFIED";
pub const CODE_INVALID_VERIFICATION_TOKEN: &str = "INVALID_VERIFICATION_TOKEN";

// User errors
pub const CODE_USER_NOT_FOUND: &str = "USER_NOT_FOUND";
pub const CODE_EMAIL_EXISTS: &str = "EMAIL_EXISTS";
pub const CODE_NICKNAME_EXISTS: &str = "NICKNAME_EXISTS";
pub const CODE_INVALID_USER_ID: &str = "INVALID_USER_ID";
pub const CODE_USER_HAS_INVITEES: &str = "USER_HAS_INVITEES";

// Authorization errors
pub const CODE_FORBIDDEN: &str = "FORBIDDEN";
pub const CODE_ADMIN_REQUIRED: &str = "ADMIN_REQUIRED";
pub const CODE_SELF_ACTION_FORBIDDEN: &str = "SELF_ACTION_FORBIDDEN";

// Password errors
pub const CODE_WRONG_PASSWORD: &str = "WRONG_PASSWORD";
pub const CODE_PASSWORD_MISMATCH: &str = "PASSWORD_MISMATCH";
pub const CODE_SAME_PASSWORD: &str = "SAME_PASSWORD";

// Generic errors
pub const CODE_CONFLICT: &str = "CONFLICT";
pub const CODE_INTERNAL_ERROR: &str = "INTERNAL_ERROR";
