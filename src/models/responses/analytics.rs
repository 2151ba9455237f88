//! Retention analytics response models.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::RetentionAnalytics;
use crate::utils::time::to_chrono;

#[derive(Debug, Serialize, ToSchema)]
pub struct RetentionAnalyticsResponse {
    #[schema(example = "507f1f77bcf86cd799439011")]
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub total_anonymous_users: u64,
    pub total_authenticated_users: u64,
    #[schema(example = "66.67%")]
    pub conversion_rate: String,
    pub inactive_users_24hr: u64,
    pub inactive_users_48hr: u64,
    pub inactive_users_1wk: u64,
    pub inactive_users_1yr: u64,
    pub total_invited_users: u64,
    pub converted_invited_users: u64,
}

impl From<RetentionAnalytics> for RetentionAnalyticsResponse {
    fn from(a: RetentionAnalytics) -> Self {
        Self {
            id: a.id.to_hex(),
            timestamp: to_chrono(a.timestamp),
            total_anonymous_users: a.total_anonymous_users,
            total_authenticated_users: a.total_authenticated_users,
            conversion_rate: a.conversion_rate,
            inactive_users_24hr: a.inactive_users_24hr,
            inactive_users_48hr: a.inactive_users_48hr,
            inactive_users_1wk: a.inactive_users_1wk,
            inactive_users_1yr: a.inactive_users_1yr,
            total_invited_users: a.total_invited_users,
            converted_invited_users: a.converted_invited_users,
        }
    }
}
