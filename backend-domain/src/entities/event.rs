// Event entity
// Canonical record of one item movement. Appended once, never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{ActionType, DateKey, EventId, ItemId, Location, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEvent {
    pub id: EventId,
    pub item_id: ItemId,
    pub user_id: UserId,
    pub action_type: ActionType,
    pub timestamp: DateTime<Utc>,
    pub date_key: DateKey,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl ItemEvent {
    /// Builds a fresh event. `date_key` is always derived from `timestamp`.
    pub fn new(
        item_id: ItemId,
        user_id: UserId,
        action_type: ActionType,
        location: Location,
        remarks: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EventId::generate(),
            item_id,
            user_id,
            action_type,
            timestamp,
            date_key: DateKey::from_timestamp(timestamp),
            location,
            remarks,
        }
    }
}
