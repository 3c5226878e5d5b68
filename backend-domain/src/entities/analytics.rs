// Analytics read models built from the materialized views

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{ActivityEntry, ItemEvent, ItemStatusCounts};
use crate::value_objects::{DateKey, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardOverview {
    pub items: ItemStatusCounts,
    pub floor_users: u64,
    pub pending_requests: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserActivitySummary {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub total_actions: u64,
    pub last_activity_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUsageSummary {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    pub total_duration_minutes: u64,
    pub items_used: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub date: DateKey,
    pub overview: DashboardOverview,
    pub today_activity: Vec<UserActivitySummary>,
    pub today_usage: Vec<UserUsageSummary>,
    pub recent_activity: Vec<ItemEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserActivityDay {
    pub date: DateKey,
    pub total_actions: u64,
    pub last_activity_at: DateTime<Utc>,
    pub activities: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<usize>,
}
