//! Authentication request models.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::validators::{validate_nickname_format, validate_password_strength};

/// Request payload for user registration
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// User's email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Password (minimum 8 characters with uppercase, lowercase, digit, and special character)
    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
    /// Optional nickname; one is generated when omitted
    #[validate(
        length(
            min = 3,
            max = 50,
            message = "Nickname must be between 3 and 50 characters"
        ),
        custom(function = "validate_nickname_format")
    )]
    #[schema(example = "brave_lion_42")]
    pub nickname: Option<String>,
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    #[schema(example = "John")]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    #[schema(example = "Doe")]
    pub last_name: Option<String>,
}

/// Request payload for user login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// User's email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// User's password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Request payload for completing an invited account
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AcceptInvitationRequest {
    /// Token from the invitation link
    #[validate(length(min = 1, message = "Invitation token is required"))]
    pub token: String,
    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
    /// Optional replacement for the generated nickname
    #[validate(
        length(
            min = 3,
            max = 50,
            message = "Nickname must be between 3 and 50 characters"
        ),
        custom(function = "validate_nickname_format")
    )]
    pub nickname: Option<String>,
}
