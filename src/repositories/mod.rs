//! Repository layer for database operations.
//!
//! Services talk to storage only through the traits below. `mongo` holds the
//! production implementation; `memory` keeps everything in process and backs
//! `STORAGE_BACKEND=memory` as well as the test-suite.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::errors::ApiError;
use crate::models::{PageRequest, RetentionAnalytics, User, UserFilter, UserSort};

pub use memory::{InMemoryRetentionRepository, InMemoryUserRepository};
pub use mongo::{MongoRetentionRepository, MongoUserRepository};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create indexes / constraints. Called once at startup.
    async fn init(&self) -> Result<(), ApiError>;

    /// Insert a new user. Duplicate email or nickname yields `ApiError::Conflict`.
    async fn insert(&self, user: &User) -> Result<(), ApiError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, ApiError>;

    /// Exact match on the normalized (lowercase) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, ApiError>;

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, ApiError>;

    /// One page of users matching `filter`, ordered by `sort`.
    async fn search(
        &self,
        filter: &UserFilter,
        sort: UserSort,
        page: PageRequest,
    ) -> Result<Vec<User>, ApiError>;

    async fn count(&self, filter: &UserFilter) -> Result<u64, ApiError>;

    /// Replace the stored document with `user`. Returns false when no user has that id.
    async fn replace(&self, user: &User) -> Result<bool, ApiError>;

    /// Returns false when no user has that id.
    async fn delete(&self, id: ObjectId) -> Result<bool, ApiError>;
}

#[async_trait]
pub trait RetentionRepository: Send + Sync {
    async fn init(&self) -> Result<(), ApiError>;

    async fn insert(&self, snapshot: &RetentionAnalytics) -> Result<(), ApiError>;

    /// Most recent snapshots first.
    async fn latest(&self, limit: i64) -> Result<Vec<RetentionAnalytics>, ApiError>;
}
