//! User document and role model.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::ToSchema;

/// User roles for role-based access control
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Registered but email not yet verified
    #[default]
    Anonymous,
    /// Verified account
    Authenticated,
    Manager,
    Admin,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Anonymous => "ANONYMOUS",
            Role::Authenticated => "AUTHENTICATED",
            Role::Manager => "MANAGER",
            Role::Admin => "ADMIN",
        }
    }

    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Admins and managers may browse and search the user base.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ANONYMOUS" => Ok(Role::Anonymous),
            "AUTHENTICATED" => Ok(Role::Authenticated),
            "MANAGER" => Ok(Role::Manager),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// User profile information
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct UserProfile {
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

/// User document stored in MongoDB
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub nickname: String,
    pub email: String,
    /// Absent until an invited user completes registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_professional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professional_status_updated_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,
    #[serde(default)]
    pub failed_login_attempts: u32,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invited_by_user_id: Option<ObjectId>,
    #[serde(default)]
    pub is_converted: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// Fresh account with a new id and both timestamps set to now.
    pub fn new(nickname: String, email: &str, role: Role) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
            nickname,
            email: email.trim().to_lowercase(),
            password_hash: None,
            profile: UserProfile::default(),
            role,
            is_professional: false,
            professional_status_updated_at: None,
            last_login_at: None,
            failed_login_attempts: 0,
            is_locked: false,
            email_verified: false,
            verification_token: None,
            invited_by_user_id: None,
            is_converted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = DateTime::now();
    }

    pub fn lock_account(&mut self) {
        self.is_locked = true;
        self.touch();
    }

    pub fn unlock_account(&mut self) {
        self.is_locked = false;
        self.failed_login_attempts = 0;
        self.touch();
    }

    /// Marks the email verified and consumes the token. Anonymous users are
    /// promoted to authenticated.
    pub fn verify_email(&mut self) {
        self.email_verified = true;
        self.verification_token = None;
        if self.role == Role::Anonymous {
            self.role = Role::Authenticated;
        }
        self.touch();
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn update_professional_status(&mut self, status: bool) {
        self.is_professional = status;
        self.professional_status_updated_at = Some(DateTime::now());
        self.touch();
    }

    /// Records a failed password check and returns true when this attempt
    /// locked the account.
    pub fn record_failed_login(&mut self, max_attempts: u32) -> bool {
        self.failed_login_attempts += 1;
        let locked_now = !self.is_locked && self.failed_login_attempts >= max_attempts;
        if locked_now {
            self.is_locked = true;
        }
        self.touch();
        locked_now
    }

    pub fn record_successful_login(&mut self) {
        self.failed_login_attempts = 0;
        self.last_login_at = Some(DateTime::now());
    }

    /// Invited placeholder accounts have no password until the invitation is accepted.
    pub fn is_pending_invitation(&self) -> bool {
        self.invited_by_user_id.is_some() && self.password_hash.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_is_case_insensitive() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(" Manager ".parse::<Role>(), Ok(Role::Manager));
        assert_eq!("AUTHENTICATED".parse::<Role>(), Ok(Role::Authenticated));
        assert_eq!(
            "superuser".parse::<Role>(),
            Err(UnknownRole("superuser".to_string()))
        );
    }

    #[test]
    fn test_role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Manager).unwrap(), "\"MANAGER\"");
        assert_eq!(Role::Anonymous.to_string(), "ANONYMOUS");
        assert!(Role::Manager.is_staff());
        assert!(!Role::Manager.is_admin());
        assert!(!Role::Authenticated.is_staff());
    }

    #[test]
    fn test_new_user_normalizes_email() {
        let user = User::new("quiet_owl_1".into(), "  Jane.Doe@Example.COM ", Role::Anonymous);
        assert_eq!(user.email, "jane.doe@example.com");
        assert!(!user.email_verified);
        assert!(!user.is_converted);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_verify_email_promotes_anonymous() {
        let mut user = User::new("quiet_owl_1".into(), "a@b.io", Role::Anonymous);
        user.verification_token = Some("tok".into());
        user.verify_email();
        assert!(user.email_verified);
        assert!(user.verification_token.is_none());
        assert!(user.has_role(Role::Authenticated));

        let mut manager = User::new("calm_fox_2".into(), "m@b.io", Role::Manager);
        manager.verify_email();
        assert!(manager.has_role(Role::Manager));
    }

    #[test]
    fn test_failed_logins_lock_at_limit() {
        let mut user = User::new("quiet_owl_1".into(), "a@b.io", Role::Authenticated);
        assert!(!user.record_failed_login(3));
        assert!(!user.record_failed_login(3));
        assert!(user.record_failed_login(3));
        assert!(user.is_locked);
        // Further failures do not report a fresh lock.
        assert!(!user.record_failed_login(3));

        user.unlock_account();
        assert!(!user.is_locked);
        assert_eq!(user.failed_login_attempts, 0);
    }

    #[test]
    fn test_bson_round_trip_keeps_optional_fields_absent() {
        let user = User::new("quiet_owl_1".into(), "a@b.io", Role::Anonymous);
        let doc = mongodb::bson::to_document(&user).unwrap();
        assert!(doc.get("last_login_at").is_none());
        assert!(doc.get("invited_by_user_id").is_none());
        assert_eq!(doc.get_str("role").unwrap(), "ANONYMOUS");

        let back: User = mongodb::bson::from_document(doc).unwrap();
        assert_eq!(back.id, user.id);
        assert_eq!(back.email, user.email);
    }
}
