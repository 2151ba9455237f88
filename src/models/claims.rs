//! JWT claims carried by every authenticated request.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::models::Role;
use crate::validators::parse_user_id;

/// Role and verification state are copied into the token at login, so they
/// can lag behind the stored user until the token expires.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Hex-encoded user id
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub email_verified: bool,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<ObjectId, ApiError> {
        parse_user_id(&self.sub)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Admins and managers
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    pub fn is_user(&self, user_id: &str) -> bool {
        self.sub == user_id
    }

    /// Owner of the resource, or an administrator
    pub fn can_access(&self, user_id: &str) -> bool {
        self.is_admin() || self.is_user(user_id)
    }
}
