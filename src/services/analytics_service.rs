//! Retention analytics: periodic snapshots of conversion and inactivity.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use mongodb::bson::oid::ObjectId;

use crate::constants::RETENTION_HISTORY_LIMIT;
use crate::errors::ApiError;
use crate::models::{RetentionAnalytics, Role, UserFilter};
use crate::repositories::{RetentionRepository, UserRepository};
use crate::utils::time::from_chrono;

/// Share of anonymous-or-authenticated users who are authenticated, as a
/// percentage string with two decimals. `"0%"` when both counts are zero.
pub fn conversion_rate(anonymous: u64, authenticated: u64) -> String {
    let population = anonymous + authenticated;
    if population == 0 {
        return "0%".to_string();
    }
    format!("{:.2}%", authenticated as f64 / population as f64 * 100.0)
}

pub struct AnalyticsService {
    users: Arc<dyn UserRepository>,
    snapshots: Arc<dyn RetentionRepository>,
}

impl AnalyticsService {
    pub fn new(users: Arc<dyn UserRepository>, snapshots: Arc<dyn RetentionRepository>) -> Self {
        Self { users, snapshots }
    }

    /// Compute a snapshot as of `now` without storing it.
    pub async fn compute_snapshot(&self, now: DateTime<Utc>) -> Result<RetentionAnalytics, ApiError> {
        let users = &self.users;
        let inactive_since = |window: chrono::Duration| {
            let filter = UserFilter::inactive_since(from_chrono(now - window));
            async move { users.count(&filter).await }
        };

        let anonymous = users.count(&UserFilter::with_role(Role::Anonymous)).await?;
        let authenticated = users
            .count(&UserFilter::with_role(Role::Authenticated))
            .await?;
        let invited = users
            .count(&UserFilter {
                invited: Some(true),
                ..Default::default()
            })
            .await?;
        let converted = users
            .count(&UserFilter {
                invited: Some(true),
                is_converted: Some(true),
                ..Default::default()
            })
            .await?;

        Ok(RetentionAnalytics {
            id: ObjectId::new(),
            timestamp: from_chrono(now),
            total_anonymous_users: anonymous,
            total_authenticated_users: authenticated,
            conversion_rate: conversion_rate(anonymous, authenticated),
            inactive_users_24hr: inactive_since(chrono::Duration::hours(24)).await?,
            inactive_users_48hr: inactive_since(chrono::Duration::hours(48)).await?,
            inactive_users_1wk: inactive_since(chrono::Duration::weeks(1)).await?,
            inactive_users_1yr: inactive_since(chrono::Duration::days(365)).await?,
            total_invited_users: invited,
            converted_invited_users: converted,
        })
    }

    /// Compute and store a snapshot for the current instant.
    pub async fn calculate_retention_metrics(&self) -> Result<RetentionAnalytics, ApiError> {
        let snapshot = self.compute_snapshot(Utc::now()).await?;
        self.snapshots.insert(&snapshot).await?;
        info!(
            "Retention snapshot stored: conversion {}, {} anonymous, {} authenticated",
            snapshot.conversion_rate,
            snapshot.total_anonymous_users,
            snapshot.total_authenticated_users
        );
        Ok(snapshot)
    }

    /// Stored snapshots, newest first.
    pub async fn get_retention_data(&self) -> Result<Vec<RetentionAnalytics>, ApiError> {
        self.snapshots.latest(RETENTION_HISTORY_LIMIT).await
    }
}

/// Recompute retention metrics every `period`, starting immediately.
/// Failures are logged and the loop carries on.
pub fn spawn_retention_job(service: Arc<AnalyticsService>, period: Duration) {
    actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            debug!("Running scheduled retention metrics calculation");
            if let Err(e) = service.calculate_retention_metrics().await {
                error!("Scheduled retention calculation failed: {}", e);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::repositories::{InMemoryRetentionRepository, InMemoryUserRepository};

    #[test]
    fn test_conversion_rate_formatting() {
        assert_eq!(conversion_rate(0, 0), "0%");
        assert_eq!(conversion_rate(1, 2), "66.67%");
        assert_eq!(conversion_rate(0, 5), "100.00%");
        assert_eq!(conversion_rate(3, 0), "0.00%");
    }

    async fn user(
        repo: &InMemoryUserRepository,
        name: &str,
        role: Role,
        last_login: Option<DateTime<Utc>>,
    ) -> User {
        let mut user = User::new(name.into(), &format!("{}@example.com", name), role);
        user.last_login_at = last_login.map(from_chrono);
        repo.insert(&user).await.unwrap();
        user
    }

    #[actix_rt::test]
    async fn test_snapshot_counts_windows() {
        let users = Arc::new(InMemoryUserRepository::new());
        let now = Utc::now();
        let hours = |h: i64| Some(now - chrono::Duration::hours(h));

        user(&users, "recent", Role::Authenticated, hours(1)).await;
        user(&users, "day_old", Role::Authenticated, hours(30)).await;
        user(&users, "three_days", Role::Anonymous, hours(72)).await;
        user(&users, "ancient", Role::Authenticated, hours(24 * 400)).await;
        user(&users, "never", Role::Anonymous, None).await;
        let mut invited = user(&users, "invited", Role::Authenticated, None).await;
        invited.invited_by_user_id = Some(ObjectId::new());
        invited.is_converted = true;
        users.replace(&invited).await.unwrap();

        let service = AnalyticsService::new(users, Arc::new(InMemoryRetentionRepository::new()));
        let snapshot = service.compute_snapshot(now).await.unwrap();

        assert_eq!(snapshot.total_anonymous_users, 2);
        assert_eq!(snapshot.total_authenticated_users, 4);
        assert_eq!(snapshot.conversion_rate, "66.67%");
        assert_eq!(snapshot.inactive_users_24hr, 3);
        assert_eq!(snapshot.inactive_users_48hr, 2);
        assert_eq!(snapshot.inactive_users_1wk, 1);
        assert_eq!(snapshot.inactive_users_1yr, 1);
        assert_eq!(snapshot.total_invited_users, 1);
        assert_eq!(snapshot.converted_invited_users, 1);
    }

    #[actix_rt::test]
    async fn test_calculated_snapshots_are_listed_newest_first() {
        let service = AnalyticsService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryRetentionRepository::new()),
        );
        assert!(service.get_retention_data().await.unwrap().is_empty());

        let first = service.calculate_retention_metrics().await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = service.calculate_retention_metrics().await.unwrap();

        let history = service.get_retention_data().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.id);
        assert_eq!(history[1].id, first.id);
        assert_eq!(history[0].conversion_rate, "0%");
    }
}
