//! Authentication handlers: registration, login, logout, email verification
//! and invitation acceptance.

use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use validator::Validate;

use crate::constants::{
    MSG_EMAIL_VERIFIED, MSG_INVITATION_ACCEPTED, MSG_LOGIN_SUCCESS, MSG_LOGOUT_SUCCESS,
    MSG_USER_REGISTERED,
};
use crate::errors::ApiError;
use crate::middleware::{require_auth, RequestExt};
use crate::models::{
    AcceptInvitationRequest, ApiResponse, AuthResponse, LoginRequest, RegisterRequest,
    UserResponse,
};
use crate::services::{AuthService, TokenBlacklist, UserService};
use crate::validators::parse_user_id;

/// Register a new user account
///
/// The first account ever registered becomes a verified administrator. All
/// later accounts start as ANONYMOUS and receive a verification link.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 409, description = "Email or nickname already exists", body = crate::models::ErrorResponse),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn register(
    user_service: web::Data<UserService>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let user = user_service.register(body.into_inner()).await?;
    let user_response: UserResponse = user.into();

    Ok(HttpResponse::Created().json(ApiResponse::success(MSG_USER_REGISTERED, user_response)))
}

/// Authenticate a user and get a JWT token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::models::ErrorResponse),
        (status = 403, description = "Account locked or email not verified", body = crate::models::ErrorResponse),
        (status = 429, description = "Too many requests")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let (user, token) = auth_service.login(body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        success: true,
        message: MSG_LOGIN_SUCCESS.to_string(),
        token,
        user: user.into(),
    }))
}

/// Logout the current user
///
/// The bearer token is revoked server-side until it expires.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "Invalid or missing token", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn logout(
    req: HttpRequest,
    token_blacklist: web::Data<TokenBlacklist>,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;

    if let Some(token) = req.get_bearer_token() {
        token_blacklist.revoke(&token.0, claims.exp).await;
        info!("User {} logged out", claims.sub);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_LOGOUT_SUCCESS)))
}

/// Verify an email address with the token from the verification link
#[utoipa::path(
    get,
    path = "/api/auth/verify-email/{user_id}/{token}",
    tag = "Authentication",
    params(
        ("user_id" = String, Path, description = "User ID"),
        ("token" = String, Path, description = "Verification token")
    ),
    responses(
        (status = 200, description = "Email verified", body = UserResponse),
        (status = 400, description = "Invalid or used token", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    )
)]
pub async fn verify_email(
    user_service: web::Data<UserService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (user_id, token) = path.into_inner();
    let user_id = parse_user_id(&user_id)?;

    let user = user_service.verify_email(user_id, &token).await?;
    let user_response: UserResponse = user.into();

    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_EMAIL_VERIFIED, user_response)))
}

/// Complete registration of an invited account
#[utoipa::path(
    post,
    path = "/api/auth/accept-invitation",
    tag = "Authentication",
    request_body = AcceptInvitationRequest,
    responses(
        (status = 200, description = "Registration completed", body = UserResponse),
        (status = 400, description = "Validation error or invalid token", body = crate::models::ErrorResponse),
        (status = 409, description = "Nickname already taken", body = crate::models::ErrorResponse)
    )
)]
pub async fn accept_invitation(
    user_service: web::Data<UserService>,
    body: web::Json<AcceptInvitationRequest>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;

    let user = user_service.accept_invitation(body.into_inner()).await?;
    let user_response: UserResponse = user.into();

    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_INVITATION_ACCEPTED, user_response)))
}
