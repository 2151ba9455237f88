//! Retention analytics snapshot.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

/// One periodic snapshot of how the user base is converting and churning.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RetentionAnalytics {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub timestamp: DateTime,
    pub total_anonymous_users: u64,
    pub total_authenticated_users: u64,
    /// Percentage with two decimals, e.g. `"66.67%"`; `"0%"` when undefined.
    pub conversion_rate: String,
    pub inactive_users_24hr: u64,
    pub inactive_users_48hr: u64,
    pub inactive_users_1wk: u64,
    pub inactive_users_1yr: u64,
    #[serde(default)]
    pub total_invited_users: u64,
    #[serde(default)]
    pub converted_invited_users: u64,
}
