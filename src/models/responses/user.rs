//! User-related response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Role, User, UserProfile};
use crate::utils::time::to_chrono;

/// User profile data returned in API responses
#[derive(Debug, Serialize, Deserialize, Clone, Default, ToSchema)]
pub struct UserProfileResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_profile_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_profile_url: Option<String>,
}

impl From<UserProfile> for UserProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            first_name: profile.first_name,
            last_name: profile.last_name,
            bio: profile.bio,
            profile_picture_url: profile.profile_picture_url,
            linkedin_profile_url: profile.linkedin_profile_url,
            github_profile_url: profile.github_profile_url,
        }
    }
}

/// User data returned in API responses (without sensitive fields)
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UserResponse {
    /// User's unique identifier
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub id: String,
    #[schema(example = "brave_lion_42")]
    pub nickname: String,
    #[schema(example = "user@example.com")]
    pub email: String,
    pub role: Role,
    pub profile: UserProfileResponse,
    pub is_professional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_status_updated_at: Option<DateTime<Utc>>,
    pub email_verified: bool,
    pub is_locked: bool,
    /// Id of the user who sent the invitation, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invited_by_user_id: Option<String>,
    pub is_converted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            nickname: user.nickname,
            email: user.email,
            role: user.role,
            profile: user.profile.into(),
            is_professional: user.is_professional,
            professional_status_updated_at: user.professional_status_updated_at.map(to_chrono),
            email_verified: user.email_verified,
            is_locked: user.is_locked,
            invited_by_user_id: user.invited_by_user_id.map(|id| id.to_hex()),
            is_converted: user.is_converted,
            last_login_at: user.last_login_at.map(to_chrono),
            created_at: to_chrono(user.created_at),
            updated_at: to_chrono(user.updated_at),
        }
    }
}

/// Response for successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    /// JWT token for authentication
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub user: UserResponse,
}

/// Result of sending an invitation
#[derive(Debug, Serialize, ToSchema)]
pub struct InvitationResponse {
    /// Id of the placeholder account created for the invitee
    pub user_id: String,
    pub email: String,
    #[schema(example = "http://localhost:8080/register?token=3kF9...")]
    pub invitation_link: String,
}

/// User statistics response (staff only)
#[derive(Debug, Serialize, ToSchema)]
pub struct UserStats {
    pub total_users: u64,
    pub anonymous_users: u64,
    pub authenticated_users: u64,
    pub manager_users: u64,
    pub admin_users: u64,
    pub locked_users: u64,
    pub verified_users: u64,
    pub invited_users: u64,
    pub converted_users: u64,
}
