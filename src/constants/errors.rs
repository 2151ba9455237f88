//! Error message constants used throughout the application.

// Authentication errors
pub const ERR_AUTH_REQUIRED: &str = "Authentication required";
pub const ERR_INVALID_AUTH_HEADER: &str = "Missing or invalid authorization header";
pub const ERR_INVALID_TOKEN: &str = "Invalid or expired token";
pub const ERR_TOKEN_REVOKED: &str = "Token has been revoked";
pub const ERR_INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const ERR_ACCOUNT_LOCKED: &str =
    "Account is locked after too many failed login attempts. Contact an administrator.";
pub const ERR_EMAIL_NOT_VERIFIED: &str = "Email address has not been verified";
pub const ERR_INVALID_VERIFICATION_TOKEN: &str = "Invalid or expired verification token";
pub const ERR_INVALID_INVITATION_TOKEN: &str = "Invalid or already used invitation token";

// User errors
pub const ERR_USER_NOT_FOUND: &str = "User not found";
pub const ERR_INVALID_USER_ID: &str = "Invalid user ID format";
pub const ERR_EMAIL_EXISTS: &str = "Email already registered";
pub const ERR_NICKNAME_EXISTS: &str = "Nickname already taken";
pub const ERR_DUPLICATE_USER: &str = "A user with this email or nickname already exists";
pub const ERR_USER_HAS_INVITEES: &str =
    "This user has invited other accounts and cannot be deleted";

// Authorization errors
pub const ERR_ONLY_ADMINS_ROLES: &str = "Only administrators can update user roles";
pub const ERR_ONLY_ADMINS_LOCK: &str = "Only administrators can lock or unlock accounts";
pub const ERR_ONLY_ADMINS_RESET_PASSWORD: &str = "Only administrators can reset passwords";
pub const ERR_ONLY_ADMINS_ANALYTICS: &str = "Only administrators can recompute analytics";
pub const ERR_ONLY_STAFF_SEARCH: &str = "Only administrators and managers can search users";
pub const ERR_ONLY_STAFF_STATS: &str = "Only administrators and managers can view statistics";
pub const ERR_ONLY_STAFF_PROFESSIONAL: &str =
    "Only administrators and managers can update professional status";
pub const ERR_CANNOT_DEMOTE_SELF: &str =
    "Administrators cannot demote themselves. Ask another admin to do this.";
pub const ERR_CANNOT_LOCK_SELF: &str = "Administrators cannot lock their own account";
pub const ERR_NO_PERMISSION_VIEW_PROFILE: &str =
    "You don't have permission to view this user's profile";
pub const ERR_NO_PERMISSION_UPDATE_PROFILE: &str =
    "You don't have permission to update this user's profile";
pub const ERR_NO_PERMISSION_DELETE_ACCOUNT: &str =
    "You don't have permission to delete this user's account";
pub const ERR_CHANGE_OWN_PASSWORD_ONLY: &str = "You can only change your own password.";
pub const ERR_VERIFIED_EMAIL_TO_INVITE: &str = "Verify your email address before inviting others";

// Password errors
pub const ERR_PASSWORD_MISMATCH: &str = "New password and confirmation do not match";
pub const ERR_SAME_PASSWORD: &str = "New password must be different from current password";
pub const ERR_WRONG_PASSWORD: &str = "Current password is incorrect";
pub const ERR_NO_PASSWORD_SET: &str = "Account registration has not been completed";

// Validation errors
pub const ERR_INVALID_ROLE: &str =
    "Role must be one of 'ANONYMOUS', 'AUTHENTICATED', 'MANAGER' or 'ADMIN'";
pub const ERR_WEAK_PASSWORD: &str =
    "Password must contain at least one uppercase, lowercase, digit, and special character";
pub const ERR_INVALID_NICKNAME_FORMAT: &str =
    "Nickname can only contain letters, numbers, underscores, and hyphens";
pub const ERR_INVALID_DATE: &str =
    "Dates must be RFC 3339 timestamps or calendar dates in YYYY-MM-DD format";
pub const ERR_DATE_RANGE: &str = "created_at_start must not be after created_at_end";
pub const ERR_INVALID_PAGE: &str = "page must be at least 1";
pub const ERR_INVALID_SIZE: &str = "size must be between 1 and 100";
pub const ERR_INVALID_SORT: &str = "sort must be a field name, optionally prefixed with '-' or suffixed with ':asc' / ':desc'. Sortable fields: nickname, email, role, created_at, updated_at, last_login_at";
