use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use thiserror::Error;
use validator::ValidationErrors;

use crate::constants::{
    CODE_CONFLICT, CODE_INTERNAL_ERROR, CODE_INVALID_TOKEN, CODE_VALIDATION_FAILED,
    ERR_DUPLICATE_USER, ERR_INVALID_TOKEN,
};
use crate::models::ErrorResponse;

/// MongoDB server error code for a unique index violation.
const DUPLICATE_KEY_ERROR: i32 = 11000;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad Request [{code}]: {message}")]
    BadRequest { code: String, message: String },
    #[error("Unauthorized [{code}]: {message}")]
    Unauthorized { code: String, message: String },
    #[error("Forbidden [{code}]: {message}")]
    Forbidden { code: String, message: String },
    #[error("Not Found [{code}]: {message}")]
    NotFound { code: String, message: String },
    #[error("Conflict [{code}]: {message}")]
    Conflict { code: String, message: String },
    #[error("Internal Server Error [{code}]: {message}")]
    InternalServerError { code: String, message: String },
    #[error("Validation Error [{code}]: {errors:?}")]
    ValidationError { code: String, errors: Vec<String> },
}

impl ApiError {
    pub fn bad_request(code: &str, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn unauthorized(code: &str, message: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn forbidden(code: &str, message: impl Into<String>) -> Self {
        ApiError::Forbidden {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn not_found(code: &str, message: impl Into<String>) -> Self {
        ApiError::NotFound {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn conflict(code: &str, message: impl Into<String>) -> Self {
        ApiError::Conflict {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::InternalServerError {
            code: CODE_INTERNAL_ERROR.to_string(),
            message: message.into(),
        }
    }

    pub fn validation(code: &str, errors: Vec<String>) -> Self {
        ApiError::ValidationError {
            code: code.to_string(),
            errors,
        }
    }

    /// Machine-readable code carried by every variant.
    pub fn code(&self) -> &str {
        match self {
            ApiError::BadRequest { code, .. }
            | ApiError::Unauthorized { code, .. }
            | ApiError::Forbidden { code, .. }
            | ApiError::NotFound { code, .. }
            | ApiError::Conflict { code, .. }
            | ApiError::InternalServerError { code, .. }
            | ApiError::ValidationError { code, .. } => code,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } | ApiError::ValidationError { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::ValidationError { code, errors } => ErrorResponse {
                success: false,
                code: code.clone(),
                message: "Validation failed".to_string(),
                errors: Some(errors.clone()),
            },
            ApiError::BadRequest { code, message }
            | ApiError::Unauthorized { code, message }
            | ApiError::Forbidden { code, message }
            | ApiError::NotFound { code, message }
            | ApiError::Conflict { code, message } => ErrorResponse {
                success: false,
                code: code.clone(),
                message: message.clone(),
                errors: None,
            },
            // Storage and crypto failures are logged, never echoed to clients.
            ApiError::InternalServerError { code, message } => {
                error!("Internal error [{}]: {}", code, message);
                ErrorResponse {
                    success: false,
                    code: code.clone(),
                    message: "An unexpected error occurred".to_string(),
                    errors: None,
                }
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::{ErrorKind, WriteFailure};

        if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = &*err.kind {
            if write_error.code == DUPLICATE_KEY_ERROR {
                return ApiError::conflict(CODE_CONFLICT, ERR_DUPLICATE_USER);
            }
        }
        ApiError::internal(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for ApiError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ApiError::internal(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ApiError::internal(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        log::debug!("JWT error: {}", err);
        ApiError::unauthorized(CODE_INVALID_TOKEN, ERR_INVALID_TOKEN)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        let mut errors: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        errors.sort();
        ApiError::validation(CODE_VALIDATION_FAILED, errors)
    }
}
