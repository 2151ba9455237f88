//! User management handlers: profiles, listing, search and invitations.

use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, info};
use validator::Validate;

use crate::constants::{
    CODE_FORBIDDEN, ERR_CHANGE_OWN_PASSWORD_ONLY, ERR_NO_PERMISSION_DELETE_ACCOUNT,
    ERR_NO_PERMISSION_UPDATE_PROFILE, ERR_NO_PERMISSION_VIEW_PROFILE, ERR_ONLY_STAFF_SEARCH,
    MSG_INVITATION_SENT, MSG_PASSWORD_CHANGED, MSG_USER_DELETED, MSG_USER_FOUND,
    MSG_USER_PROFILE_RETRIEVED, MSG_USER_UPDATED,
};
use crate::errors::ApiError;
use crate::middleware::{require_access, require_auth, require_owner_or_staff, require_staff};
use crate::models::{
    ApiResponse, ChangePasswordRequest, InviteUserRequest, ListUsersQuery, PageRequest,
    UpdateUserRequest, User, UserPageResponse, UserResponse, UserSearchQuery,
};
use crate::services::UserService;
use crate::validators::parse_user_id;

fn page_response(users: Vec<User>, total: u64, page: PageRequest) -> UserPageResponse {
    let data: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    UserPageResponse::new(data, total, page)
}

/// List users, newest first (admins and managers)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "One page of users", body = UserPageResponse),
        (status = 400, description = "Invalid page or size", body = crate::models::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 403, description = "Caller is not staff", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_users(
    user_service: web::Data<UserService>,
    query: web::Query<ListUsersQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_staff(&claims, ERR_ONLY_STAFF_SEARCH)?;

    let page = query.into_inner().into_page()?;
    let (users, total) = user_service.list_users(page).await?;

    Ok(HttpResponse::Ok().json(page_response(users, total, page)))
}

/// Search users by nickname, email, role, flags and creation date (admins and managers)
///
/// Every parameter is optional. Text filters match a case-insensitive
/// substring. Results are paginated and sorted (default `-created_at`); an
/// empty match is an empty page.
#[utoipa::path(
    get,
    path = "/api/users/search",
    tag = "Users",
    params(UserSearchQuery),
    responses(
        (status = 200, description = "Matching users", body = UserPageResponse),
        (status = 400, description = "Invalid query parameter", body = crate::models::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 403, description = "Caller is not staff", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn search_users(
    user_service: web::Data<UserService>,
    query: web::Query<UserSearchQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    require_staff(&claims, ERR_ONLY_STAFF_SEARCH)?;

    let criteria = query.into_inner().into_criteria()?;
    let (users, total) = user_service.search_users(&criteria).await?;
    debug!(
        "User {} searched users: {} matches, page {} returned {}",
        claims.sub,
        total,
        criteria.page.page,
        users.len()
    );

    Ok(HttpResponse::Ok().json(page_response(users, total, criteria.page)))
}

/// Get a specific user by ID (owner, admin or manager)
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    let user_id = parse_user_id(&path)?;
    require_owner_or_staff(&claims, &user_id.to_hex(), ERR_NO_PERMISSION_VIEW_PROFILE)?;

    let user_response: UserResponse = user_service.get_user(user_id).await?.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_USER_FOUND, user_response)))
}

/// Get the currently authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_current_user(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    let user_id = claims.user_id()?;

    let user_response: UserResponse = user_service.get_user(user_id).await?.into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MSG_USER_PROFILE_RETRIEVED,
        user_response,
    )))
}

/// Update a user's profile
///
/// Admins can update any user, everyone else only themselves.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse),
        (status = 409, description = "Email or nickname already taken", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_user(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    let user_id = parse_user_id(&path)?;
    require_access(&claims, &user_id.to_hex(), ERR_NO_PERMISSION_UPDATE_PROFILE)?;

    if claims.is_admin() && !claims.is_user(&user_id.to_hex()) {
        info!("Admin {} updating profile of user {}", claims.sub, user_id);
    }

    body.validate()?;

    let user_response: UserResponse = user_service
        .update_user(user_id, body.into_inner())
        .await?
        .into();
    Ok(HttpResponse::Ok().json(ApiResponse::success(MSG_USER_UPDATED, user_response)))
}

/// Delete a user account (owner or admin)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted"),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::models::ErrorResponse),
        (status = 404, description = "User not found", body = crate::models::ErrorResponse),
        (status = 409, description = "User still has invited accounts", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_user(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    let user_id = parse_user_id(&path)?;
    require_access(&claims, &user_id.to_hex(), ERR_NO_PERMISSION_DELETE_ACCOUNT)?;

    user_service.delete_user(user_id).await?;
    info!("User {} deleted account {}", claims.sub, user_id);

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_USER_DELETED)))
}

/// Change the caller's own password
#[utoipa::path(
    patch,
    path = "/api/users/{id}/password",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Validation error or wrong current password", body = crate::models::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 403, description = "Not the caller's account", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn change_password(
    user_service: web::Data<UserService>,
    path: web::Path<String>,
    body: web::Json<ChangePasswordRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    let user_id = parse_user_id(&path)?;
    if !claims.is_user(&user_id.to_hex()) {
        return Err(ApiError::forbidden(CODE_FORBIDDEN, ERR_CHANGE_OWN_PASSWORD_ONLY));
    }

    body.validate()?;
    user_service
        .change_password(user_id, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(MSG_PASSWORD_CHANGED)))
}

/// Invite someone by email
///
/// Creates a placeholder account linked to the caller and returns the
/// invitation link that completes it.
#[utoipa::path(
    post,
    path = "/api/users/invite",
    tag = "Users",
    request_body = InviteUserRequest,
    responses(
        (status = 201, description = "Invitation created", body = crate::models::InvitationResponse),
        (status = 400, description = "Validation error", body = crate::models::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::models::ErrorResponse),
        (status = 403, description = "Caller's email is not verified", body = crate::models::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::models::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn invite_user(
    user_service: web::Data<UserService>,
    body: web::Json<InviteUserRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = require_auth(&req)?;
    let inviter = claims.user_id()?;
    body.validate()?;

    let invitation = user_service.invite(inviter, &body.email).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(MSG_INVITATION_SENT, invitation)))
}
