//! Request middleware and the helpers handlers use to read what it stores.

pub mod auth_helpers;
pub mod auth_middleware;
pub mod rate_limiter;
pub mod request_ext;

pub use auth_helpers::*;
pub use auth_middleware::AuthMiddleware;
pub use rate_limiter::{create_auth_rate_limiter_config, AuthRateLimiterConfig};
pub use request_ext::{BearerToken, RequestExt};
