//! Request models for API endpoints.

pub mod auth;
pub mod search;
pub mod user;

pub use auth::*;
pub use search::*;
pub use user::*;
