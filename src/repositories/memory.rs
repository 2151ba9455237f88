//! In-process repositories backed by a `HashMap` behind a tokio `RwLock`.

use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::constants::{CODE_EMAIL_EXISTS, CODE_NICKNAME_EXISTS, ERR_EMAIL_EXISTS, ERR_NICKNAME_EXISTS};
use crate::errors::ApiError;
use crate::models::{PageRequest, RetentionAnalytics, User, UserFilter, UserSort};

use super::{RetentionRepository, UserRepository};

/// Mirrors the unique `email` / `nickname` indexes of the MongoDB collection.
fn check_unique<'a>(
    mut others: impl Iterator<Item = &'a User>,
    candidate: &User,
) -> Result<(), ApiError> {
    others.try_for_each(|existing| {
        if existing.id == candidate.id {
            Ok(())
        } else if existing.email == candidate.email {
            Err(ApiError::conflict(CODE_EMAIL_EXISTS, ERR_EMAIL_EXISTS))
        } else if existing.nickname == candidate.nickname {
            Err(ApiError::conflict(CODE_NICKNAME_EXISTS, ERR_NICKNAME_EXISTS))
        } else {
            Ok(())
        }
    })
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<ObjectId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn init(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn insert(&self, user: &User) -> Result<(), ApiError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(ApiError::conflict(CODE_EMAIL_EXISTS, ERR_EMAIL_EXISTS));
        }
        check_unique(users.values(), user)?;
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, ApiError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let email = email.trim().to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.nickname == nickname)
            .cloned())
    }

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>, ApiError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn search(
        &self,
        filter: &UserFilter,
        sort: UserSort,
        page: PageRequest,
    ) -> Result<Vec<User>, ApiError> {
        let users = self.users.read().await;
        let mut matched: Vec<&User> = users.values().filter(|u| filter.matches(u)).collect();
        matched.sort_by(|a, b| sort.compare(a, b));
        debug!(
            "In-memory search matched {} users, returning page {} of size {}",
            matched.len(),
            page.page,
            page.size
        );

        Ok(matched
            .into_iter()
            .skip(usize::try_from(page.skip()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.size).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &UserFilter) -> Result<u64, ApiError> {
        let users = self.users.read().await;
        Ok(users.values().filter(|u| filter.matches(u)).count() as u64)
    }

    async fn replace(&self, user: &User) -> Result<bool, ApiError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Ok(false);
        }
        check_unique(users.values(), user)?;
        users.insert(user.id, user.clone());
        Ok(true)
    }

    async fn delete(&self, id: ObjectId) -> Result<bool, ApiError> {
        Ok(self.users.write().await.remove(&id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryRetentionRepository {
    snapshots: RwLock<Vec<RetentionAnalytics>>,
}

impl InMemoryRetentionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RetentionRepository for InMemoryRetentionRepository {
    async fn init(&self) -> Result<(), ApiError> {
        Ok(())
    }

    async fn insert(&self, snapshot: &RetentionAnalytics) -> Result<(), ApiError> {
        self.snapshots.write().await.push(snapshot.clone());
        Ok(())
    }

    async fn latest(&self, limit: i64) -> Result<Vec<RetentionAnalytics>, ApiError> {
        let mut snapshots = self.snapshots.read().await.clone();
        snapshots.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        snapshots.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, SortDirection, SortField};
    use mongodb::bson::DateTime;

    fn user(n: usize, role: Role) -> User {
        let mut user = User::new(format!("user_{:03}", n), &format!("u{}@example.com", n), role);
        user.created_at = DateTime::from_millis(1_700_000_000_000 + n as i64 * 1_000);
        user
    }

    async fn seeded(count: usize) -> InMemoryUserRepository {
        let repo = InMemoryUserRepository::new();
        for n in 0..count {
            let role = if n % 4 == 0 { Role::Manager } else { Role::Authenticated };
            repo.insert(&user(n, role)).await.unwrap();
        }
        repo
    }

    #[actix_rt::test]
    async fn test_insert_enforces_unique_email_and_nickname() {
        let repo = InMemoryUserRepository::new();
        repo.insert(&user(1, Role::Authenticated)).await.unwrap();

        let mut same_email = user(2, Role::Authenticated);
        same_email.email = "u1@example.com".into();
        assert!(matches!(
            repo.insert(&same_email).await,
            Err(ApiError::Conflict { .. })
        ));

        let mut same_nickname = user(3, Role::Authenticated);
        same_nickname.nickname = "user_001".into();
        assert!(matches!(
            repo.insert(&same_nickname).await,
            Err(ApiError::Conflict { .. })
        ));
    }

    #[actix_rt::test]
    async fn test_replace_and_delete() {
        let repo = seeded(2).await;
        let mut first = repo.find_by_nickname("user_000").await.unwrap().unwrap();
        first.is_locked = true;
        assert!(repo.replace(&first).await.unwrap());
        assert!(repo.find_by_id(first.id).await.unwrap().unwrap().is_locked);

        // Taking the other user's email is rejected.
        first.email = "u1@example.com".into();
        assert!(repo.replace(&first).await.is_err());

        assert!(repo.delete(first.id).await.unwrap());
        assert!(!repo.delete(first.id).await.unwrap());
        assert!(!repo.replace(&first).await.unwrap());
    }

    #[actix_rt::test]
    async fn test_pages_cover_every_match_exactly_once() {
        let repo = seeded(250).await;
        let filter = UserFilter::with_role(Role::Authenticated);
        let total = repo.count(&filter).await.unwrap();
        assert_eq!(total, 187);

        let sort = UserSort::default();
        let mut seen = Vec::new();
        let mut page_no = 1;
        loop {
            let page = PageRequest::new(page_no, 40).unwrap();
            let batch = repo.search(&filter, sort, page).await.unwrap();
            if batch.is_empty() {
                break;
            }
            seen.extend(batch);
            page_no += 1;
        }

        assert_eq!(seen.len() as u64, total);
        assert!(seen
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
        let mut ids: Vec<_> = seen.iter().map(|u| u.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len() as u64, total);
    }

    #[actix_rt::test]
    async fn test_search_sorts_by_requested_field() {
        let repo = seeded(30).await;
        let sort = UserSort {
            field: SortField::Nickname,
            direction: SortDirection::Asc,
        };
        let page = repo
            .search(&UserFilter::default(), sort, PageRequest::new(2, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(page.first().unwrap().nickname, "user_010");
        assert_eq!(page.last().unwrap().nickname, "user_019");
    }

    #[actix_rt::test]
    async fn test_search_past_the_end_is_empty() {
        let repo = seeded(5).await;
        let page = repo
            .search(
                &UserFilter::default(),
                UserSort::default(),
                PageRequest::new(3, 10).unwrap(),
            )
            .await
            .unwrap();
        assert!(page.is_empty());
    }

    #[actix_rt::test]
    async fn test_lookup_by_email_is_case_insensitive_and_by_token() {
        let repo = InMemoryUserRepository::new();
        let mut u = user(7, Role::Anonymous);
        u.verification_token = Some("abc".into());
        repo.insert(&u).await.unwrap();

        assert!(repo.find_by_email(" U7@Example.com").await.unwrap().is_some());
        assert!(repo.find_by_verification_token("abc").await.unwrap().is_some());
        assert!(repo.find_by_verification_token("abd").await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_latest_snapshots_newest_first() {
        let repo = InMemoryRetentionRepository::new();
        for millis in [3_000, 1_000, 2_000] {
            repo.insert(&RetentionAnalytics {
                id: ObjectId::new(),
                timestamp: DateTime::from_millis(millis),
                total_anonymous_users: 0,
                total_authenticated_users: 0,
                conversion_rate: "0%".into(),
                inactive_users_24hr: 0,
                inactive_users_48hr: 0,
                inactive_users_1wk: 0,
                inactive_users_1yr: 0,
                total_invited_users: 0,
                converted_invited_users: 0,
            })
            .await
            .unwrap();
        }

        let latest = repo.latest(2).await.unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].timestamp.timestamp_millis(), 3_000);
        assert_eq!(latest[1].timestamp.timestamp_millis(), 2_000);
    }
}
