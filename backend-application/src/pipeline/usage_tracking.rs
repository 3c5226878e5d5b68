use chrono::{DateTime, Utc};

use backend_domain::ports::UsageRepository;
use backend_domain::{ActionType, DateKey, ItemId, ItemType, StoreResult, UsageEntry, UserId};

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// SCAN_IN appended a new open entry.
    Opened,
    /// SCAN_OUT closed this entry.
    Closed(UsageEntry),
    /// SCAN_OUT found no open entry for the item on that day.
    Unmatched,
    /// Not a scan action; the snapshot was not touched.
    Ignored,
}

/// Applies one scan to the `(user_id, date_key)` usage snapshot.
///
/// Both branches are single atomic store operations, so two concurrent
/// SCAN_OUTs for the same open entry cannot both close it.
pub async fn apply_scan(
    usage: &dyn UsageRepository,
    user_id: &UserId,
    item_id: &ItemId,
    item_type: ItemType,
    action_type: ActionType,
    timestamp: DateTime<Utc>,
    date_key: DateKey,
) -> StoreResult<ScanOutcome> {
    match action_type {
        ActionType::ScanIn => {
            let entry = UsageEntry::open(item_id.clone(), item_type, timestamp);
            usage.open_entry(user_id, date_key, entry).await?;
            Ok(ScanOutcome::Opened)
        }
        ActionType::ScanOut => {
            let closed = usage
                .close_open_entry(user_id, date_key, item_id, timestamp)
                .await?;
            Ok(closed.map_or(ScanOutcome::Unmatched, ScanOutcome::Closed))
        }
        _ => Ok(ScanOutcome::Ignored),
    }
}
