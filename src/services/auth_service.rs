//! Authentication service for login, token generation, and password utilities.

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, info, warn};

use crate::config::CONFIG;
use crate::constants::{
    CODE_ACCOUNT_LOCKED, CODE_EMAIL_NOT_VERIFIED, CODE_INVALID_CREDENTIALS, ERR_ACCOUNT_LOCKED,
    ERR_EMAIL_NOT_VERIFIED, ERR_INVALID_CREDENTIALS,
};
use crate::errors::ApiError;
use crate::models::{Claims, LoginRequest, User};
use crate::repositories::UserRepository;
use crate::utils::log_sanitizer::mask_email;

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    max_login_attempts: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self::with_max_login_attempts(users, CONFIG.max_login_attempts)
    }

    pub fn with_max_login_attempts(users: Arc<dyn UserRepository>, max_login_attempts: u32) -> Self {
        Self {
            users,
            max_login_attempts: max_login_attempts.max(1),
        }
    }

    /// Authenticate a user and return a JWT token.
    ///
    /// Checks run in this order: unknown email, locked account, unverified
    /// email, password. Each wrong password counts towards the lock limit.
    pub async fn login(&self, req: LoginRequest) -> Result<(User, String), ApiError> {
        let invalid = || ApiError::unauthorized(CODE_INVALID_CREDENTIALS, ERR_INVALID_CREDENTIALS);
        let masked = mask_email(&req.email);

        let mut user = self.users.find_by_email(&req.email).await?.ok_or_else(|| {
            warn!("Login failed: no account for {}", masked);
            invalid()
        })?;

        if user.is_locked {
            warn!("Login refused: account {} is locked", user.id);
            return Err(ApiError::forbidden(CODE_ACCOUNT_LOCKED, ERR_ACCOUNT_LOCKED));
        }

        if !user.email_verified {
            warn!("Login refused: email of account {} not verified", user.id);
            return Err(ApiError::forbidden(
                CODE_EMAIL_NOT_VERIFIED,
                ERR_EMAIL_NOT_VERIFIED,
            ));
        }

        let password_ok = match user.password_hash.as_deref() {
            Some(stored) => verify_password(&req.password, stored)?,
            None => false,
        };

        if !password_ok {
            let locked_now = user.record_failed_login(self.max_login_attempts);
            self.users.replace(&user).await?;
            warn!(
                "Login failed for account {} ({} of {} attempts)",
                user.id, user.failed_login_attempts, self.max_login_attempts
            );
            if locked_now {
                warn!(
                    "Account {} locked after {} failed login attempts",
                    user.id, user.failed_login_attempts
                );
                return Err(ApiError::forbidden(CODE_ACCOUNT_LOCKED, ERR_ACCOUNT_LOCKED));
            }
            return Err(invalid());
        }

        user.record_successful_login();
        self.users.replace(&user).await?;

        let token = generate_token(&user)?;
        info!("User {} logged in", user.id);
        Ok((user, token))
    }
}

/// Hash a password using bcrypt at the configured cost.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    Ok(hash(password, CONFIG.bcrypt_cost)?)
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    Ok(verify(password, hash)?)
}

/// Generate a JWT token for a user.
pub fn generate_token(user: &User) -> Result<String, ApiError> {
    let now = Utc::now().timestamp().max(0) as usize;
    let exp = now + (CONFIG.jwt_expiration_hours.max(1) as usize * 3600);

    let claims = Claims {
        sub: user.id.to_hex(),
        email: user.email.clone(),
        role: user.role,
        email_verified: user.email_verified,
        exp,
        iat: now,
    };

    debug!("Generated token for user {} with role {}", user.id, user.role);

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(CONFIG.jwt_secret.as_bytes()),
    )?)
}

/// Validate signature and expiry and return the embedded claims.
pub fn decode_token(token: &str) -> Result<Claims, ApiError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(CONFIG.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}
