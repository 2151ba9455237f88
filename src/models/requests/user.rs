//! User-related request models.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::validators::{validate_nickname_format, validate_password_strength, validate_role};

/// Request payload for updating user profile
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "newemail@example.com")]
    pub email: Option<String>,
    /// New nickname (3-50 characters, letters, numbers, underscores, hyphens only)
    #[validate(
        length(
            min = 3,
            max = 50,
            message = "Nickname must be between 3 and 50 characters"
        ),
        custom(function = "validate_nickname_format")
    )]
    #[schema(example = "calm_otter_7")]
    pub nickname: Option<String>,
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    #[schema(example = "John")]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    #[schema(example = "Doe")]
    pub last_name: Option<String>,
    /// User bio (max 500 characters)
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    #[schema(example = "Software developer passionate about Rust")]
    pub bio: Option<String>,
    #[validate(url(message = "Profile picture must be a valid URL"))]
    #[schema(example = "https://example.com/me.png")]
    pub profile_picture_url: Option<String>,
    #[validate(url(message = "LinkedIn profile must be a valid URL"))]
    #[schema(example = "https://linkedin.com/in/johndoe")]
    pub linkedin_profile_url: Option<String>,
    #[validate(url(message = "GitHub profile must be a valid URL"))]
    #[schema(example = "https://github.com/johndoe")]
    pub github_profile_url: Option<String>,
}

/// Request payload for changing password
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    /// Current password for verification
    #[validate(length(min = 1, message = "Current password is required"))]
    #[schema(example = "CurrentPass123!")]
    pub current_password: String,
    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "NewSecurePass456!")]
    pub new_password: String,
    #[validate(length(min = 1, message = "Password confirmation is required"))]
    #[schema(example = "NewSecurePass456!")]
    pub confirm_password: String,
}

/// Request payload for updating user role (admin only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    /// New role: ANONYMOUS, AUTHENTICATED, MANAGER or ADMIN
    #[validate(custom(function = "validate_role"))]
    #[schema(example = "MANAGER")]
    pub role: String,
}

/// Request payload for an administrator setting someone else's password
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(custom(function = "validate_password_strength"))]
    #[schema(example = "FreshStart789!")]
    pub new_password: String,
}

/// Request payload for setting professional status
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfessionalStatusRequest {
    #[schema(example = true)]
    pub is_professional: bool,
}

/// Request payload for inviting a new user
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InviteUserRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "friend@example.com")]
    pub email: String,
}
