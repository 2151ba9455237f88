//! User-related custom validators.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

use crate::constants::{ERR_INVALID_NICKNAME_FORMAT, ERR_INVALID_ROLE, ERR_WEAK_PASSWORD};
use crate::models::Role;

const MIN_PASSWORD_LENGTH: usize = 8;

lazy_static! {
    static ref NICKNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Custom validator for role field.
pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    role.parse::<Role>()
        .map(|_| ())
        .map_err(|_| invalid("invalid_role", ERR_INVALID_ROLE))
}

pub fn validate_nickname_format(nickname: &str) -> Result<(), ValidationError> {
    if NICKNAME_RE.is_match(nickname) {
        Ok(())
    } else {
        Err(invalid("invalid_nickname", ERR_INVALID_NICKNAME_FORMAT))
    }
}

/// At least 8 characters with an uppercase letter, a lowercase letter, a digit
/// and a special character.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let strong = password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_uppercase())
        && password.chars().any(|c| c.is_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_alphanumeric());

    if strong {
        Ok(())
    } else {
        Err(invalid("weak_password", ERR_WEAK_PASSWORD))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_role() {
        assert!(validate_role("admin").is_ok());
        assert!(validate_role("MANAGER").is_ok());
        assert!(validate_role("user").is_err());
    }

    #[test]
    fn test_validate_nickname_format() {
        assert!(validate_nickname_format("brave_lion-42").is_ok());
        assert!(validate_nickname_format("brave lion").is_err());
        assert!(validate_nickname_format("lion$").is_err());
    }

    #[test]
    fn test_validate_password_strength() {
        assert!(validate_password_strength("SecurePass123!").is_ok());
        assert!(validate_password_strength("Sh0rt!").is_err());
        assert!(validate_password_strength("alllowercase1!").is_err());
        assert!(validate_password_strength("NoDigitsHere!").is_err());
        assert!(validate_password_strength("NoSpecial123").is_err());
    }
}
