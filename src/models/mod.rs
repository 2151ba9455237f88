//! Data models organized by type.

pub mod analytics;
pub mod claims;
pub mod requests;
pub mod responses;
pub mod search;
pub mod user;

pub use analytics::*;
pub use claims::*;
pub use requests::*;
pub use responses::*;
pub use search::*;
pub use user::*;
