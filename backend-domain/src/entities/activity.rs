// Per-user-per-day activity rollup

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::ItemEvent;
use crate::value_objects::{ActionType, DateKey, ItemId, Location, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub item_id: ItemId,
    pub action_type: ActionType,
    pub timestamp: DateTime<Utc>,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl From<&ItemEvent> for ActivityEntry {
    fn from(event: &ItemEvent) -> Self {
        Self {
            item_id: event.item_id.clone(),
            action_type: event.action_type,
            timestamp: event.timestamp,
            location: event.location,
            remarks: event.remarks.clone(),
        }
    }
}

/// Keyed by `(user_id, date_key)`. `total_actions` always equals
/// `activities.len()` and `last_activity_at` the newest entry timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityAggregate {
    pub user_id: UserId,
    pub date_key: DateKey,
    pub activities: Vec<ActivityEntry>,
    pub total_actions: u64,
    pub last_activity_at: DateTime<Utc>,
}

impl ActivityAggregate {
    pub fn start(user_id: UserId, date_key: DateKey, entry: ActivityEntry) -> Self {
        Self {
            user_id,
            date_key,
            last_activity_at: entry.timestamp,
            activities: vec![entry],
            total_actions: 1,
        }
    }

    pub fn push(&mut self, entry: ActivityEntry) {
        if entry.timestamp > self.last_activity_at {
            self.last_activity_at = entry.timestamp;
        }
        self.activities.push(entry);
        self.total_actions += 1;
    }
}
