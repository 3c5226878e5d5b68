// Single-process store backing every repository port.
//
// All state sits behind one RwLock. Every mutation holds the write guard for
// its whole read-modify-write, which keeps aggregate updates and request
// reviews atomic with respect to each other.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use backend_application::Stores;

use backend_domain::{
    ActivityAggregate, ActivityEntry, ActivityRepository, DateKey, DateRange, EventRepository,
    Item, ItemEvent, ItemFilter, ItemId, ItemRepository, ItemStatus, ItemStatusCounts,
    MovementRequest, MovementRequestRepository, RequestFilter, RequestId, RequestStatus,
    ReviewDecision, Role, StoreError, StoreResult, UsageEntry, UsageRepository, UsageSnapshot,
    User, UserId, UserRepository,
};

use super::snapshot::{load_snapshot, save_snapshot, snapshot_path, StoreSnapshot};

type DayKey = (UserId, DateKey);

#[derive(Default)]
struct StoreState {
    events: Vec<ItemEvent>,
    activity: HashMap<DayKey, ActivityAggregate>,
    usage: HashMap<DayKey, UsageSnapshot>,
    items: HashMap<ItemId, Item>,
    requests: HashMap<RequestId, MovementRequest>,
    users: HashMap<UserId, User>,
}

impl StoreState {
    fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            events: snapshot.events,
            activity: snapshot
                .activity
                .into_iter()
                .map(|aggregate| ((aggregate.user_id.clone(), aggregate.date_key), aggregate))
                .collect(),
            usage: snapshot
                .usage
                .into_iter()
                .map(|usage| ((usage.user_id.clone(), usage.date_key), usage))
                .collect(),
            items: snapshot
                .items
                .into_iter()
                .map(|item| (item.id.clone(), item))
                .collect(),
            requests: snapshot
                .requests
                .into_iter()
                .map(|request| (request.id.clone(), request))
                .collect(),
            users: snapshot
                .users
                .into_iter()
                .map(|user| (user.id.clone(), user))
                .collect(),
        }
    }

    fn to_snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            events: self.events.clone(),
            activity: self.activity.values().cloned().collect(),
            usage: self.usage.values().cloned().collect(),
            items: self.items.values().cloned().collect(),
            requests: self.requests.values().cloned().collect(),
            users: self.users.values().cloned().collect(),
            ..StoreSnapshot::default()
        }
    }

    fn code_taken(&self, item: &Item) -> bool {
        self.items.values().any(|existing| {
            existing.id != item.id
                && (existing.qr_code == item.qr_code || existing.identity_code == item.identity_code)
        })
    }
}

pub struct MemoryStore {
    state: RwLock<StoreState>,
    snapshot_path: Option<PathBuf>,
    dirty: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Purely in-memory store, nothing is persisted.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            snapshot_path: None,
            dirty: AtomicBool::new(false),
        }
    }

    /// Opens a store persisted under `data_dir`, restoring the last snapshot.
    pub async fn open(data_dir: &Path) -> Result<Self> {
        let path = snapshot_path(data_dir);
        let snapshot = load_snapshot(&path).await?;
        info!(
            path = %path.display(),
            events = snapshot.events.len(),
            items = snapshot.items.len(),
            users = snapshot.users.len(),
            "memory store restored"
        );
        Ok(Self {
            state: RwLock::new(StoreState::from_snapshot(snapshot)),
            snapshot_path: Some(path),
            dirty: AtomicBool::new(false),
        })
    }

    /// Hands the same store out as every repository port.
    pub fn stores(self: &Arc<Self>) -> Stores {
        Stores {
            events: self.clone(),
            activity: self.clone(),
            usage: self.clone(),
            items: self.clone(),
            requests: self.clone(),
            users: self.clone(),
        }
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Writes a snapshot if anything changed since the last one. Returns
    /// whether a file was written.
    pub async fn persist(&self) -> Result<bool> {
        let Some(path) = &self.snapshot_path else {
            return Ok(false);
        };
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(false);
        }
        let snapshot = self.state.read().await.to_snapshot().stamped(Utc::now());
        if let Err(err) = save_snapshot(path, &snapshot).await {
            self.dirty.store(true, Ordering::Release);
            return Err(err);
        }
        debug!(path = %path.display(), events = snapshot.events.len(), "snapshot written");
        Ok(true)
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }
}

/// Stable sort, so rows fed in newest-appended order keep that order on ties.
fn newest_first<T, K: Ord>(mut rows: Vec<T>, key: impl Fn(&T) -> K, limit: usize) -> Vec<T> {
    rows.sort_by_key(|row| Reverse(key(row)));
    rows.truncate(limit);
    rows
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn append(&self, event: &ItemEvent) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.events.iter().any(|existing| existing.id == event.id) {
            return Err(StoreError::Duplicate(format!("event {}", event.id)));
        }
        state.events.push(event.clone());
        self.mark_dirty();
        Ok(())
    }

    async fn list_for_item(
        &self,
        item_id: &ItemId,
        range: DateRange,
        limit: usize,
    ) -> StoreResult<Vec<ItemEvent>> {
        let state = self.state.read().await;
        let rows = state
            .events
            .iter()
            .rev()
            .filter(|event| &event.item_id == item_id && range.contains(event.date_key))
            .cloned()
            .collect();
        Ok(newest_first(rows, |event: &ItemEvent| event.timestamp, limit))
    }

    async fn list_since(&self, since: DateTime<Utc>, limit: usize) -> StoreResult<Vec<ItemEvent>> {
        let state = self.state.read().await;
        let rows = state
            .events
            .iter()
            .rev()
            .filter(|event| event.timestamp >= since)
            .cloned()
            .collect();
        Ok(newest_first(rows, |event: &ItemEvent| event.timestamp, limit))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ActivityRepository for MemoryStore {
    async fn record_activity(
        &self,
        user_id: &UserId,
        date_key: DateKey,
        entry: ActivityEntry,
    ) -> StoreResult<ActivityAggregate> {
        let mut state = self.state.write().await;
        let aggregate = state
            .activity
            .entry((user_id.clone(), date_key))
            .and_modify(|aggregate| aggregate.push(entry.clone()))
            .or_insert_with(|| ActivityAggregate::start(user_id.clone(), date_key, entry));
        let result = aggregate.clone();
        self.mark_dirty();
        Ok(result)
    }

    async fn get(&self, user_id: &UserId, date_key: DateKey) -> StoreResult<Option<ActivityAggregate>> {
        let state = self.state.read().await;
        Ok(state.activity.get(&(user_id.clone(), date_key)).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        range: DateRange,
        limit: usize,
    ) -> StoreResult<Vec<ActivityAggregate>> {
        let state = self.state.read().await;
        let rows = state
            .activity
            .values()
            .filter(|aggregate| &aggregate.user_id == user_id && range.contains(aggregate.date_key))
            .cloned()
            .collect();
        Ok(newest_first(rows, |aggregate: &ActivityAggregate| aggregate.date_key, limit))
    }

    async fn list_for_date(&self, date_key: DateKey, limit: usize) -> StoreResult<Vec<ActivityAggregate>> {
        let state = self.state.read().await;
        let rows = state
            .activity
            .values()
            .filter(|aggregate| aggregate.date_key == date_key)
            .cloned()
            .collect();
        Ok(newest_first(
            rows,
            |aggregate: &ActivityAggregate| aggregate.last_activity_at,
            limit,
        ))
    }
}

#[async_trait]
impl UsageRepository for MemoryStore {
    async fn open_entry(&self, user_id: &UserId, date_key: DateKey, entry: UsageEntry) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state
            .usage
            .entry((user_id.clone(), date_key))
            .or_insert_with(|| UsageSnapshot::new(user_id.clone(), date_key))
            .open_entry(entry);
        self.mark_dirty();
        Ok(())
    }

    async fn close_open_entry(
        &self,
        user_id: &UserId,
        date_key: DateKey,
        item_id: &ItemId,
        scan_out: DateTime<Utc>,
    ) -> StoreResult<Option<UsageEntry>> {
        let mut state = self.state.write().await;
        let closed = state
            .usage
            .get_mut(&(user_id.clone(), date_key))
            .and_then(|snapshot| snapshot.close_open_entry(item_id, scan_out));
        if closed.is_some() {
            self.mark_dirty();
        }
        Ok(closed)
    }

    async fn get(&self, user_id: &UserId, date_key: DateKey) -> StoreResult<Option<UsageSnapshot>> {
        let state = self.state.read().await;
        Ok(state.usage.get(&(user_id.clone(), date_key)).cloned())
    }

    async fn list_for_date(&self, date_key: DateKey, limit: usize) -> StoreResult<Vec<UsageSnapshot>> {
        let state = self.state.read().await;
        let rows = state
            .usage
            .values()
            .filter(|snapshot| snapshot.date_key == date_key)
            .cloned()
            .collect();
        Ok(newest_first(
            rows,
            |snapshot: &UsageSnapshot| snapshot.total_duration_minutes,
            limit,
        ))
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn insert(&self, item: &Item) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.items.contains_key(&item.id) || state.code_taken(item) {
            return Err(StoreError::Duplicate(format!("item {}", item.qr_code)));
        }
        state.items.insert(item.id.clone(), item.clone());
        self.mark_dirty();
        Ok(())
    }

    async fn get(&self, item_id: &ItemId) -> StoreResult<Option<Item>> {
        let state = self.state.read().await;
        Ok(state.items.get(item_id).cloned())
    }

    async fn find_by_qr_code(&self, qr_code: &str) -> StoreResult<Option<Item>> {
        let state = self.state.read().await;
        Ok(state.items.values().find(|item| item.qr_code == qr_code).cloned())
    }

    async fn find_by_identity_code(&self, identity_code: &str) -> StoreResult<Option<Item>> {
        let state = self.state.read().await;
        Ok(state
            .items
            .values()
            .find(|item| item.identity_code == identity_code)
            .cloned())
    }

    async fn save(&self, item: &Item) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.code_taken(item) {
            return Err(StoreError::Conflict(format!(
                "item codes of {} collide with another item",
                item.id
            )));
        }
        state.items.insert(item.id.clone(), item.clone());
        self.mark_dirty();
        Ok(())
    }

    async fn assign(
        &self,
        item_id: &ItemId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Item>> {
        let mut state = self.state.write().await;
        let Some(item) = state.items.get_mut(item_id) else {
            return Ok(None);
        };
        item.assign_to(user_id.clone(), at);
        let updated = item.clone();
        self.mark_dirty();
        Ok(Some(updated))
    }

    async fn set_status(
        &self,
        item_id: &ItemId,
        status: ItemStatus,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<Item>> {
        let mut state = self.state.write().await;
        let Some(item) = state.items.get_mut(item_id) else {
            return Ok(None);
        };
        item.set_status(status, at);
        let updated = item.clone();
        self.mark_dirty();
        Ok(Some(updated))
    }

    async fn list(&self, filter: &ItemFilter) -> StoreResult<Vec<Item>> {
        let state = self.state.read().await;
        let rows = state
            .items
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        Ok(newest_first(rows, |item: &Item| item.created_at, filter.limit))
    }

    async fn count_by_status(&self) -> StoreResult<ItemStatusCounts> {
        let state = self.state.read().await;
        let mut counts = ItemStatusCounts::default();
        for item in state.items.values() {
            counts.record(item.status);
        }
        Ok(counts)
    }
}

#[async_trait]
impl MovementRequestRepository for MemoryStore {
    async fn insert(&self, request: &MovementRequest) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.requests.contains_key(&request.id) {
            return Err(StoreError::Duplicate(format!("request {}", request.id)));
        }
        state.requests.insert(request.id.clone(), request.clone());
        self.mark_dirty();
        Ok(())
    }

    async fn get(&self, request_id: &RequestId) -> StoreResult<Option<MovementRequest>> {
        let state = self.state.read().await;
        Ok(state.requests.get(request_id).cloned())
    }

    async fn list(&self, filter: &RequestFilter) -> StoreResult<Vec<MovementRequest>> {
        let state = self.state.read().await;
        let rows = state
            .requests
            .values()
            .filter(|request| filter.matches(request))
            .cloned()
            .collect();
        Ok(newest_first(
            rows,
            |request: &MovementRequest| request.requested_at,
            filter.limit,
        ))
    }

    async fn complete_review(
        &self,
        request_id: &RequestId,
        decision: ReviewDecision,
        reviewer: &UserId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<MovementRequest>> {
        let mut state = self.state.write().await;
        let Some(request) = state.requests.get_mut(request_id) else {
            return Ok(None);
        };
        request
            .review(decision, reviewer.clone(), at)
            .map_err(|err| StoreError::Conflict(err.to_string()))?;
        let reviewed = request.clone();
        self.mark_dirty();
        Ok(Some(reviewed))
    }

    async fn count_pending(&self) -> StoreResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .requests
            .values()
            .filter(|request| request.status == RequestStatus::Pending)
            .count() as u64)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if state.users.contains_key(&user.id)
            || state.users.values().any(|existing| existing.email == user.email)
        {
            return Err(StoreError::Duplicate(format!("user {}", user.email)));
        }
        state.users.insert(user.id.clone(), user.clone());
        self.mark_dirty();
        Ok(())
    }

    async fn get(&self, user_id: &UserId) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(user_id).cloned())
    }

    async fn list(&self, role: Option<Role>, limit: usize) -> StoreResult<Vec<User>> {
        let state = self.state.read().await;
        let rows = state
            .users
            .values()
            .filter(|user| role.map_or(true, |role| user.role == role))
            .cloned()
            .collect();
        Ok(newest_first(rows, |user: &User| user.created_at, limit))
    }

    async fn count_by_role(&self, role: Role) -> StoreResult<u64> {
        let state = self.state.read().await;
        Ok(state.users.values().filter(|user| user.role == role).count() as u64)
    }
}
