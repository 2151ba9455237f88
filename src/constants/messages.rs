//! Success message constants used throughout the application.

// Authentication messages
pub const MSG_USER_REGISTERED: &str = "User registered successfully";
pub const MSG_LOGIN_SUCCESS: &str = "Login successful";
pub const MSG_LOGOUT_SUCCESS: &str = "Logout successful";
pub const MSG_EMAIL_VERIFIED: &str = "Email verified successfully";
pub const MSG_INVITATION_ACCEPTED: &str = "Invitation accepted, registration complete";

// User management messages
pub const MSG_USER_FOUND: &str = "User found";
pub const MSG_USER_PROFILE_RETRIEVED: &str = "User profile retrieved";
pub const MSG_USER_UPDATED: &str = "User profile updated successfully";
pub const MSG_USER_DELETED: &str = "User account deleted successfully";
pub const MSG_PASSWORD_CHANGED: &str = "Password changed successfully";
pub const MSG_INVITATION_SENT: &str = "Invitation sent";

// Admin messages
pub const MSG_ROLE_UPDATED: &str = "User role updated successfully";
pub const MSG_USER_LOCKED: &str = "User account locked";
pub const MSG_USER_UNLOCKED: &str = "User account unlocked";
pub const MSG_PASSWORD_RESET: &str = "Password reset successfully";
pub const MSG_PROFESSIONAL_STATUS_UPDATED: &str = "Professional status updated";
pub const MSG_USER_STATISTICS: &str = "User statistics";

// Analytics messages
pub const MSG_RETENTION_DATA: &str = "Retention analytics";
pub const MSG_RETENTION_CALCULATED: &str = "Retention metrics calculated";
