//! Response models for API endpoints.

pub mod analytics;
pub mod api;
pub mod pagination;
pub mod user;

pub use analytics::*;
pub use api::*;
pub use pagination::*;
pub use user::*;
