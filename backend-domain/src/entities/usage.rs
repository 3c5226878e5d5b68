// Per-user-per-day usage duration tracker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::whole_minutes_between;
use crate::value_objects::{DateKey, ItemId, ItemType, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEntry {
    pub item_id: ItemId,
    pub item_type: ItemType,
    pub scan_in: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_out: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

impl UsageEntry {
    pub fn open(item_id: ItemId, item_type: ItemType, scan_in: DateTime<Utc>) -> Self {
        Self {
            item_id,
            item_type,
            scan_in,
            scan_out: None,
            duration_minutes: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.scan_out.is_none()
    }
}

/// Keyed by `(user_id, date_key)`. `total_duration_minutes` is the sum of
/// `duration_minutes` over closed entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub user_id: UserId,
    pub date_key: DateKey,
    pub items_used: Vec<UsageEntry>,
    pub total_duration_minutes: u64,
}

impl UsageSnapshot {
    pub fn new(user_id: UserId, date_key: DateKey) -> Self {
        Self {
            user_id,
            date_key,
            items_used: Vec::new(),
            total_duration_minutes: 0,
        }
    }

    /// Appends an open entry. Several open entries for one item may coexist.
    pub fn open_entry(&mut self, entry: UsageEntry) {
        self.items_used.push(entry);
    }

    /// Closes the earliest open entry for `item_id` (by `scan_in`, then by
    /// position) and returns it. `None` leaves the snapshot untouched.
    pub fn close_open_entry(
        &mut self,
        item_id: &ItemId,
        scan_out: DateTime<Utc>,
    ) -> Option<UsageEntry> {
        let index = self
            .items_used
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_open() && &entry.item_id == item_id)
            .min_by_key(|(position, entry)| (entry.scan_in, *position))
            .map(|(position, _)| position)?;

        let entry = &mut self.items_used[index];
        let duration = whole_minutes_between(entry.scan_in, scan_out);
        entry.scan_out = Some(scan_out);
        entry.duration_minutes = Some(duration);
        self.total_duration_minutes += u64::from(duration);
        Some(entry.clone())
    }

    pub fn open_entries(&self) -> impl Iterator<Item = &UsageEntry> {
        self.items_used.iter().filter(|entry| entry.is_open())
    }
}
