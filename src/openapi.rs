use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::models::{
    AcceptInvitationRequest, AuthResponse, ChangePasswordRequest, ErrorResponse, HealthResponse,
    InvitationResponse, InviteUserRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    RetentionAnalyticsResponse, Role, UpdateProfessionalStatusRequest, UpdateRoleRequest,
    UpdateUserRequest, UserPageResponse, UserProfileResponse, UserResponse, UserStats,
};

/// OpenAPI documentation for the User Management API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Management API",
        version = "0.1.0",
        description = "User management REST API with role-based access control, administrator search and retention analytics.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "API Support", email = "support@example.com")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Authentication", description = "Registration, login, logout, email verification and invitations"),
        (name = "Users", description = "Profiles, listing, search and invitations"),
        (name = "Admin", description = "Roles, account locks, professional status and statistics"),
        (name = "Analytics", description = "Retention analytics snapshots")
    ),
    paths(
        crate::handlers::register,
        crate::handlers::login,
        crate::handlers::logout,
        crate::handlers::verify_email,
        crate::handlers::accept_invitation,
        crate::handlers::get_users,
        crate::handlers::search_users,
        crate::handlers::get_user,
        crate::handlers::get_current_user,
        crate::handlers::update_user,
        crate::handlers::delete_user,
        crate::handlers::change_password,
        crate::handlers::invite_user,
        crate::handlers::update_role,
        crate::handlers::lock_user,
        crate::handlers::unlock_user,
        crate::handlers::reset_password,
        crate::handlers::update_professional_status,
        crate::handlers::get_user_stats,
        crate::handlers::get_retention_data,
        crate::handlers::calculate_retention,
        crate::routes::health_check
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AcceptInvitationRequest,
            UpdateUserRequest,
            ChangePasswordRequest,
            UpdateRoleRequest,
            ResetPasswordRequest,
            UpdateProfessionalStatusRequest,
            InviteUserRequest,
            Role,
            UserResponse,
            UserProfileResponse,
            UserPageResponse,
            AuthResponse,
            InvitationResponse,
            UserStats,
            RetentionAnalyticsResponse,
            ErrorResponse,
            HealthResponse
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security configuration for Bearer token authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "JWT token obtained from the /api/auth/login endpoint",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_search_and_security_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/users/search"));
        assert!(doc.paths.paths.contains_key("/api/analytics/retention"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("UserPageResponse"));
    }
}
