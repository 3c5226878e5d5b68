use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    ActivityAggregate,
    ActivityEntry,
    Item,
    ItemEvent,
    ItemFilter,
    ItemStatusCounts,
    MovementRequest,
    RequestFilter,
    ReviewDecision,
    UsageEntry,
    UsageSnapshot,
    User,
};
use crate::error::StoreResult;
use crate::value_objects::{DateKey, DateRange, ItemId, ItemStatus, RequestId, Role, UserId};

/// Append-only canonical event log. Stored events are never updated or deleted.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn append(&self, event: &ItemEvent) -> StoreResult<()>;
    /// Newest first.
    async fn list_for_item(
        &self,
        item_id: &ItemId,
        range: DateRange,
        limit: usize,
    ) -> StoreResult<Vec<ItemEvent>>;
    /// Newest first.
    async fn list_since(&self, since: DateTime<Utc>, limit: usize) -> StoreResult<Vec<ItemEvent>>;
    async fn ping(&self) -> StoreResult<()>;
}

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Atomically creates or extends the `(user, date)` aggregate with one entry.
    async fn record_activity(
        &self,
        user_id: &UserId,
        date_key: DateKey,
        entry: ActivityEntry,
    ) -> StoreResult<ActivityAggregate>;
    async fn get(&self, user_id: &UserId, date_key: DateKey) -> StoreResult<Option<ActivityAggregate>>;
    /// Newest date first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        range: DateRange,
        limit: usize,
    ) -> StoreResult<Vec<ActivityAggregate>>;
    async fn list_for_date(&self, date_key: DateKey, limit: usize) -> StoreResult<Vec<ActivityAggregate>>;
}

#[async_trait]
pub trait UsageRepository: Send + Sync {
    /// Atomically creates the `(user, date)` snapshot if needed and appends an open entry.
    async fn open_entry(&self, user_id: &UserId, date_key: DateKey, entry: UsageEntry) -> StoreResult<()>;
    /// Atomically closes the earliest open entry for `item_id`. Returns the
    /// closed entry, or `None` when nothing was open.
    async fn close_open_entry(
        &self,
        user_id: &UserId,
        date_key: DateKey,
        item_id: &ItemId,
        scan_out: DateTime<Utc>,
    ) -> StoreResult<Option<UsageEntry>>;
    async fn get(&self, user_id: &UserId, date_key: DateKey) -> StoreResult<Option<UsageSnapshot>>;
    async fn list_for_date(&self, date_key: DateKey, limit: usize) -> StoreResult<Vec<UsageSnapshot>>;
}

#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Fails with `StoreError::Duplicate` when the QR or identity code is taken.
    async fn insert(&self, item: &Item) -> StoreResult<()>;
    async fn get(&self, item_id: &ItemId) -> StoreResult<Option<Item>>;
    async fn find_by_qr_code(&self, qr_code: &str) -> StoreResult<Option<Item>>;
    async fn find_by_identity_code(&self, identity_code: &str) -> StoreResult<Option<Item>>;
    async fn save(&self, item: &Item) -> StoreResult<()>;
    /// Atomically makes `user_id` the assignee. Other fields keep their
    /// stored values. Returns the updated item, or `None` when it is missing.
    async fn assign(
        &self,
        item_id: &ItemId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Item>>;
    /// Atomically changes only the status.
    async fn set_status(
        &self,
        item_id: &ItemId,
        status: ItemStatus,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Item>>;
    /// Newest first.
    async fn list(&self, filter: &ItemFilter) -> StoreResult<Vec<Item>>;
    async fn count_by_status(&self) -> StoreResult<ItemStatusCounts>;
}

#[async_trait]
pub trait MovementRequestRepository: Send + Sync {
    async fn insert(&self, request: &MovementRequest) -> StoreResult<()>;
    async fn get(&self, request_id: &RequestId) -> StoreResult<Option<MovementRequest>>;
    /// Newest first.
    async fn list(&self, filter: &RequestFilter) -> StoreResult<Vec<MovementRequest>>;
    /// Compare-and-set on `status == pending`. Returns `None` when the request
    /// does not exist and `StoreError::Conflict` when it was already reviewed.
    async fn complete_review(
        &self,
        request_id: &RequestId,
        decision: ReviewDecision,
        reviewer: &UserId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<MovementRequest>>;
    async fn count_pending(&self) -> StoreResult<u64>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `StoreError::Duplicate` when the email is taken.
    async fn insert(&self, user: &User) -> StoreResult<()>;
    async fn get(&self, user_id: &UserId) -> StoreResult<Option<User>>;
    async fn list(&self, role: Option<Role>, limit: usize) -> StoreResult<Vec<User>>;
    async fn count_by_role(&self, role: Role) -> StoreResult<u64>;
}
