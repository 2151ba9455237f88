//! MongoDB collection names.

pub const COLLECTION_USERS: &str = "users";
pub const COLLECTION_RETENTION_ANALYTICS: &str = "retention_analytics";
