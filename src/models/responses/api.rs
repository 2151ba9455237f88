//! Response envelopes shared by every endpoint.

use serde::Serialize;
use utoipa::ToSchema;

/// `{ success, message, data }` envelope for single-object responses.
/// Paginated endpoints use `UserPageResponse` instead.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Success without a payload, e.g. after a delete or logout.
    pub fn message(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            data: None,
        }
    }
}

/// Body of every non-2xx response produced by `ApiError`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = false)]
    pub success: bool,
    /// Machine-readable error code
    #[schema(example = "INVALID_QUERY")]
    pub code: String,
    #[schema(example = "Validation failed")]
    pub message: String,
    /// One entry per rejected field or parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "OK")]
    pub status: String,
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Active persistence layer
    #[schema(example = "mongodb")]
    pub storage: String,
}
