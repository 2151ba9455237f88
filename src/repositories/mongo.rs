//! MongoDB repositories for users and retention snapshots.

use async_trait::async_trait;
use futures::TryStreamExt;
use log::{debug, info};
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

use crate::constants::{COLLECTION_RETENTION_ANALYTICS, COLLECTION_USERS};
use crate::errors::ApiError;
use crate::models::{PageRequest, RetentionAnalytics, User, UserFilter, UserSort};

use super::{RetentionRepository, UserRepository};

/// Translate a typed filter into a MongoDB query document.
pub fn filter_document(filter: &UserFilter) -> Document {
    let mut query = Document::new();

    // Text filters are matched literally, never as caller-supplied patterns.
    let substring = |needle: &str| doc! { "$regex": regex::escape(needle), "$options": "i" };

    if let Some(nickname) = &filter.nickname {
        query.insert("nickname", substring(nickname));
    }
    if let Some(email) = &filter.email {
        query.insert("email", substring(email));
    }
    if let Some(role) = filter.role {
        query.insert("role", role.as_str());
    }
    if let Some(is_locked) = filter.is_locked {
        query.insert("is_locked", is_locked);
    }
    if let Some(email_verified) = filter.email_verified {
        query.insert("email_verified", email_verified);
    }

    let mut created = Document::new();
    if let Some(from) = filter.created_from {
        created.insert("$gte", from);
    }
    if let Some(until) = filter.created_until {
        created.insert("$lte", until);
    }
    if !created.is_empty() {
        query.insert("created_at", created);
    }

    if let Some(cutoff) = filter.last_login_before {
        query.insert("last_login_at", doc! { "$lt": cutoff });
    }

    let mut inviter = Document::new();
    if let Some(invited) = filter.invited {
        inviter.insert("$exists", invited);
    }
    if let Some(id) = filter.invited_by {
        inviter.insert("$eq", id);
    }
    if !inviter.is_empty() {
        query.insert("invited_by_user_id", inviter);
    }

    if let Some(is_converted) = filter.is_converted {
        query.insert("is_converted", is_converted);
    }

    query
}

/// Sort document with `_id` as the tie-breaker so pages never overlap.
pub fn sort_document(sort: UserSort) -> Document {
    let mut order = Document::new();
    order.insert(sort.field.field_name(), sort.direction.as_i32());
    order.insert("_id", 1);
    order
}

/// Repository for user-related database operations.
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_USERS),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    /// Creates:
    /// - unique indexes on `email` and `nickname`
    /// - an index per commonly filtered or sorted field
    /// - a sparse index on `verification_token`
    async fn init(&self) -> Result<(), ApiError> {
        info!("Creating database indexes for users collection...");

        let unique = || IndexOptions::builder().unique(true).build();
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique())
                .build(),
            IndexModel::builder()
                .keys(doc! { "nickname": 1 })
                .options(unique())
                .build(),
            IndexModel::builder().keys(doc! { "role": 1 }).build(),
            IndexModel::builder()
                .keys(doc! { "created_at": -1, "_id": 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "last_login_at": 1 })
                .build(),
            IndexModel::builder()
                .keys(doc! { "verification_token": 1 })
                .options(IndexOptions::builder().sparse(true).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        info!("Database indexes created successfully");
        Ok(())
    }

    async fn insert(&self, user: &User) -> Result<(), ApiError> {
        self.collection.insert_one(user).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, ApiError> {
        debug!("Repository: Finding user by ID: {}", id);
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .collection
            .find_one(doc! { "email": email.trim().to_lowercase() })
            .await?)
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .collection
            .find_one(doc! { "nickname": nickname })
            .await?)
    }

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .collection
            .find_one(doc! { "verification_token": token })
            .await?)
    }

    async fn search(
        &self,
        filter: &UserFilter,
        sort: UserSort,
        page: PageRequest,
    ) -> Result<Vec<User>, ApiError> {
        let query = filter_document(filter);
        debug!(
            "Repository: Searching users with filter: {:?}, skip {}, limit {}",
            query,
            page.skip(),
            page.size
        );

        let cursor = self
            .collection
            .find(query)
            .sort(sort_document(sort))
            .skip(page.skip())
            .limit(page.size as i64)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, ApiError> {
        Ok(self
            .collection
            .count_documents(filter_document(filter))
            .await?)
    }

    async fn replace(&self, user: &User) -> Result<bool, ApiError> {
        let result = self
            .collection
            .replace_one(doc! { "_id": user.id }, user)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, ApiError> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}

pub struct MongoRetentionRepository {
    collection: Collection<RetentionAnalytics>,
}

impl MongoRetentionRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(COLLECTION_RETENTION_ANALYTICS),
        }
    }
}

#[async_trait]
impl RetentionRepository for MongoRetentionRepository {
    async fn init(&self) -> Result<(), ApiError> {
        self.collection
            .create_index(IndexModel::builder().keys(doc! { "timestamp": -1 }).build())
            .await?;
        Ok(())
    }

    async fn insert(&self, snapshot: &RetentionAnalytics) -> Result<(), ApiError> {
        self.collection.insert_one(snapshot).await?;
        Ok(())
    }

    async fn latest(&self, limit: i64) -> Result<Vec<RetentionAnalytics>, ApiError> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "timestamp": -1 })
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, SortDirection, SortField};
    use mongodb::bson::DateTime;

    #[test]
    fn test_empty_filter_is_empty_document() {
        assert!(filter_document(&UserFilter::default()).is_empty());
    }

    #[test]
    fn test_text_filters_are_escaped_case_insensitive_regexes() {
        let filter = UserFilter {
            nickname: Some("a.b*".into()),
            ..Default::default()
        };
        let query = filter_document(&filter);
        let nickname = query.get_document("nickname").unwrap();
        assert_eq!(nickname.get_str("$regex").unwrap(), r"a\.b\*");
        assert_eq!(nickname.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_equality_and_range_predicates() {
        let from = DateTime::from_millis(1_000);
        let until = DateTime::from_millis(2_000);
        let filter = UserFilter {
            role: Some(Role::Admin),
            is_locked: Some(true),
            email_verified: Some(false),
            created_from: Some(from),
            created_until: Some(until),
            invited: Some(false),
            ..Default::default()
        };
        let query = filter_document(&filter);

        assert_eq!(query.get_str("role").unwrap(), "ADMIN");
        assert!(query.get_bool("is_locked").unwrap());
        assert!(!query.get_bool("email_verified").unwrap());
        let created = query.get_document("created_at").unwrap();
        assert_eq!(created.get_datetime("$gte").unwrap(), &from);
        assert_eq!(created.get_datetime("$lte").unwrap(), &until);
        assert!(!query
            .get_document("invited_by_user_id")
            .unwrap()
            .get_bool("$exists")
            .unwrap());
    }

    #[test]
    fn test_invitees_of_filters_on_inviter_id() {
        let inviter = ObjectId::new();
        let query = filter_document(&UserFilter::invitees_of(inviter));
        let invited_by = query.get_document("invited_by_user_id").unwrap();
        assert_eq!(invited_by.get_object_id("$eq").unwrap(), inviter);
        assert!(invited_by.get("$exists").is_none());
    }

    #[test]
    fn test_inactive_filter_uses_strict_bound() {
        let cutoff = DateTime::from_millis(5_000);
        let query = filter_document(&UserFilter::inactive_since(cutoff));
        let last_login = query.get_document("last_login_at").unwrap();
        assert_eq!(last_login.get_datetime("$lt").unwrap(), &cutoff);
    }

    #[test]
    fn test_sort_document_has_id_tie_breaker() {
        let order = sort_document(UserSort {
            field: SortField::Email,
            direction: SortDirection::Desc,
        });
        let keys: Vec<&String> = order.keys().collect();
        assert_eq!(keys, vec!["email", "_id"]);
        assert_eq!(order.get_i32("email").unwrap(), -1);
        assert_eq!(order.get_i32("_id").unwrap(), 1);
    }
}
