mod common;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use backend_application::commands::item_commands::{scan_item, ScanItemCommand};
use backend_application::{AppError, PipelineRecord};
use backend_domain::{
    ActionType, ActivityAggregate, ActivityEntry, ActivityRepository, DateKey, DateRange,
    EventRepository, ItemEvent, ItemId, ItemLookup, ItemType, Location, Role, StoreError,
    StoreResult, UsageEntry, UsageRepository, UsageSnapshot, UserId,
};
use backend_domain::ports::Clock;
use backend_infrastructure::MemoryStore;

use common::{at, Fixture};

fn scan(item_qr: &str, action: ActionType) -> ScanItemCommand {
    ScanItemCommand {
        lookup: ItemLookup::QrCode(item_qr.to_string()),
        action,
        location: Location::Floor1,
        remarks: None,
    }
}

#[tokio::test]
async fn every_event_lands_in_the_daily_aggregate_in_order() {
    let fx = Fixture::new().await;
    let worker = fx.user("Wendy Floor", Role::FloorUser).await;
    let item = fx.item_assigned_to("QR-100", ItemType::Headset, &worker).await;

    let actions = [ActionType::ScanIn, ActionType::ScanOut, ActionType::ScanIn, ActionType::ScanOut];
    for action in actions {
        fx.clock.advance(Duration::minutes(7));
        scan_item(&fx.state, &worker, scan("QR-100", action)).await.unwrap();
    }

    let key = DateKey::from_timestamp(fx.clock.now());
    let aggregate = ActivityRepository::get(fx.store.as_ref(), &worker.user_id, key)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(aggregate.total_actions, 4);
    let recorded: Vec<ActionType> = aggregate.activities.iter().map(|a| a.action_type).collect();
    assert_eq!(recorded, actions.to_vec());
    assert!(aggregate.activities.iter().all(|a| a.item_id == item.id));
    assert_eq!(aggregate.last_activity_at, fx.clock.now());

    let events = fx
        .store
        .list_for_item(&item.id, DateRange::default(), 100)
        .await
        .unwrap();
    assert_eq!(events.len(), 4);
    assert_eq!(fx.state.metrics.pipeline_events(), 4);
}

#[tokio::test]
async fn scan_out_closes_usage_with_floored_minutes() {
    let fx = Fixture::new().await;
    let worker = fx.user("Wendy Floor", Role::FloorUser).await;
    fx.item_assigned_to("QR-200", ItemType::Monitor, &worker).await;

    fx.clock.set(at(3, 10, 0, 0));
    scan_item(&fx.state, &worker, scan("QR-200", ActionType::ScanIn)).await.unwrap();
    fx.clock.set(at(3, 12, 5, 59));
    scan_item(&fx.state, &worker, scan("QR-200", ActionType::ScanOut)).await.unwrap();

    let key = DateKey::from_timestamp(at(3, 10, 0, 0));
    let snapshot = UsageRepository::get(fx.store.as_ref(), &worker.user_id, key)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.items_used.len(), 1);
    let entry = &snapshot.items_used[0];
    assert_eq!(entry.item_type, ItemType::Monitor);
    assert_eq!(entry.scan_out, Some(at(3, 12, 5, 59)));
    assert_eq!(entry.duration_minutes, Some(125));
    assert_eq!(snapshot.total_duration_minutes, 125);
}

#[tokio::test]
async fn unmatched_scan_out_still_records_the_event() {
    let fx = Fixture::new().await;
    let worker = fx.user("Wendy Floor", Role::FloorUser).await;
    let item = fx.item_assigned_to("QR-300", ItemType::Keyboard, &worker).await;

    scan_item(&fx.state, &worker, scan("QR-300", ActionType::ScanOut)).await.unwrap();

    let key = DateKey::from_timestamp(fx.clock.now());
    assert!(UsageRepository::get(fx.store.as_ref(), &worker.user_id, key)
        .await
        .unwrap()
        .is_none());
    let events = fx
        .store
        .list_for_item(&item.id, DateRange::default(), 10)
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action_type, ActionType::ScanOut);
    let aggregate = ActivityRepository::get(fx.store.as_ref(), &worker.user_id, key)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(aggregate.total_actions, 1);
}

#[tokio::test]
async fn repeated_scan_in_closes_earliest_entry_first() {
    let fx = Fixture::new().await;
    let worker = fx.user("Wendy Floor", Role::FloorUser).await;
    fx.item_assigned_to("QR-400", ItemType::Mouse, &worker).await;

    fx.clock.set(at(3, 9, 0, 0));
    scan_item(&fx.state, &worker, scan("QR-400", ActionType::ScanIn)).await.unwrap();
    fx.clock.set(at(3, 9, 30, 0));
    scan_item(&fx.state, &worker, scan("QR-400", ActionType::ScanIn)).await.unwrap();
    fx.clock.set(at(3, 10, 0, 0));
    scan_item(&fx.state, &worker, scan("QR-400", ActionType::ScanOut)).await.unwrap();

    let key = DateKey::from_timestamp(at(3, 9, 0, 0));
    let snapshot = UsageRepository::get(fx.store.as_ref(), &worker.user_id, key)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.items_used[0].duration_minutes, Some(60));
    assert!(snapshot.items_used[1].is_open());
    assert_eq!(snapshot.total_duration_minutes, 60);
}

#[tokio::test]
async fn events_split_across_midnight_utc() {
    let fx = Fixture::new().await;
    let worker = fx.user("Wendy Floor", Role::FloorUser).await;
    fx.item_assigned_to("QR-500", ItemType::Ups, &worker).await;

    fx.clock.set(at(3, 23, 59, 59));
    scan_item(&fx.state, &worker, scan("QR-500", ActionType::ScanIn)).await.unwrap();
    fx.clock.set(at(4, 0, 0, 0));
    scan_item(&fx.state, &worker, scan("QR-500", ActionType::ScanOut)).await.unwrap();

    let day_one = DateKey::from_timestamp(at(3, 23, 59, 59));
    let day_two = DateKey::from_timestamp(at(4, 0, 0, 0));
    assert_eq!(day_one.to_string(), "2024-06-03");
    assert_eq!(day_two.to_string(), "2024-06-04");

    for key in [day_one, day_two] {
        let aggregate = ActivityRepository::get(fx.store.as_ref(), &worker.user_id, key)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(aggregate.total_actions, 1);
    }
    // The scan out lands on a day with no open entry.
    assert!(UsageRepository::get(fx.store.as_ref(), &worker.user_id, day_two)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn concurrent_scan_outs_close_an_entry_once() {
    let fx = Arc::new(Fixture::new().await);
    let worker = fx.user("Wendy Floor", Role::FloorUser).await;
    fx.item_assigned_to("QR-600", ItemType::SystemUnit, &worker).await;

    fx.clock.set(at(3, 9, 0, 0));
    scan_item(&fx.state, &worker, scan("QR-600", ActionType::ScanIn)).await.unwrap();
    fx.clock.set(at(3, 9, 45, 0));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let fx = fx.clone();
        let worker = worker.clone();
        handles.push(tokio::spawn(async move {
            scan_item(&fx.state, &worker, scan("QR-600", ActionType::ScanOut)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let key = DateKey::from_timestamp(at(3, 9, 0, 0));
    let snapshot = UsageRepository::get(fx.store.as_ref(), &worker.user_id, key)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(snapshot.total_duration_minutes, 45);
    let aggregate = ActivityRepository::get(fx.store.as_ref(), &worker.user_id, key)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(aggregate.total_actions, 9);
}

struct BrokenActivity;

#[async_trait]
impl ActivityRepository for BrokenActivity {
    async fn record_activity(
        &self,
        _user_id: &UserId,
        _date_key: DateKey,
        _entry: ActivityEntry,
    ) -> StoreResult<ActivityAggregate> {
        Err(StoreError::Backend(anyhow::anyhow!("activity store offline")))
    }

    async fn get(&self, _user_id: &UserId, _date_key: DateKey) -> StoreResult<Option<ActivityAggregate>> {
        Ok(None)
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
        _range: DateRange,
        _limit: usize,
    ) -> StoreResult<Vec<ActivityAggregate>> {
        Ok(Vec::new())
    }

    async fn list_for_date(&self, _date_key: DateKey, _limit: usize) -> StoreResult<Vec<ActivityAggregate>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn activity_failure_keeps_the_appended_event() {
    let store = Arc::new(MemoryStore::new());
    let mut stores = store.stores();
    stores.activity = Arc::new(BrokenActivity);
    let fx = Fixture::with_stores(store.clone(), stores).await;

    let item_id = ItemId::from("item-x");
    let result = fx
        .state
        .pipeline
        .record(PipelineRecord::new(
            item_id.clone(),
            fx.admin.user_id.clone(),
            ActionType::ScanIn,
            Location::Storage,
        ))
        .await;
    assert!(matches!(result, Err(StoreError::Backend(_))));

    let events = store
        .list_for_item(&item_id, DateRange::default(), 10)
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(fx.state.metrics.partial_failures(), 1);
    assert_eq!(fx.state.metrics.pipeline_events(), 0);

    let err = AppError::from(result.unwrap_err());
    assert!(matches!(err, AppError::Internal(_)));
}

struct BrokenEvents;

#[async_trait]
impl EventRepository for BrokenEvents {
    async fn append(&self, _event: &ItemEvent) -> StoreResult<()> {
        Err(StoreError::Backend(anyhow::anyhow!("event log offline")))
    }

    async fn list_for_item(
        &self,
        _item_id: &ItemId,
        _range: DateRange,
        _limit: usize,
    ) -> StoreResult<Vec<ItemEvent>> {
        Ok(Vec::new())
    }

    async fn list_since(&self, _since: DateTime<Utc>, _limit: usize) -> StoreResult<Vec<ItemEvent>> {
        Ok(Vec::new())
    }

    async fn ping(&self) -> StoreResult<()> {
        Err(StoreError::Backend(anyhow::anyhow!("event log offline")))
    }
}

#[tokio::test]
async fn event_append_failure_skips_every_view_update() {
    let store = Arc::new(MemoryStore::new());
    let mut stores = store.stores();
    stores.events = Arc::new(BrokenEvents);
    let fx = Fixture::with_stores(store.clone(), stores).await;
    let worker = fx.user("Wendy Floor", Role::FloorUser).await;
    let item = fx.item_assigned_to("QR-700", ItemType::Headset, &worker).await;

    let result = fx
        .state
        .pipeline
        .record(
            PipelineRecord::new(
                item.id.clone(),
                worker.user_id.clone(),
                ActionType::ScanIn,
                Location::Floor1,
            )
            .with_item_type(ItemType::Headset),
        )
        .await;
    assert!(matches!(result, Err(StoreError::Backend(_))));

    let key = DateKey::from_timestamp(fx.clock.now());
    assert!(ActivityRepository::get(store.as_ref(), &worker.user_id, key)
        .await
        .unwrap()
        .is_none());
    assert!(UsageRepository::get(store.as_ref(), &worker.user_id, key)
        .await
        .unwrap()
        .is_none());
    assert_eq!(fx.state.metrics.pipeline_failures(), 1);
    assert_eq!(fx.state.metrics.partial_failures(), 0);
    assert_eq!(fx.state.metrics.pipeline_events(), 0);
}

struct BrokenUsage;

#[async_trait]
impl UsageRepository for BrokenUsage {
    async fn open_entry(&self, _user_id: &UserId, _date_key: DateKey, _entry: UsageEntry) -> StoreResult<()> {
        Err(StoreError::Backend(anyhow::anyhow!("usage store offline")))
    }

    async fn close_open_entry(
        &self,
        _user_id: &UserId,
        _date_key: DateKey,
        _item_id: &ItemId,
        _scan_out: DateTime<Utc>,
    ) -> StoreResult<Option<UsageEntry>> {
        Err(StoreError::Backend(anyhow::anyhow!("usage store offline")))
    }

    async fn get(&self, _user_id: &UserId, _date_key: DateKey) -> StoreResult<Option<UsageSnapshot>> {
        Ok(None)
    }

    async fn list_for_date(&self, _date_key: DateKey, _limit: usize) -> StoreResult<Vec<UsageSnapshot>> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn usage_failure_keeps_event_and_activity() {
    let store = Arc::new(MemoryStore::new());
    let mut stores = store.stores();
    stores.usage = Arc::new(BrokenUsage);
    let fx = Fixture::with_stores(store.clone(), stores).await;
    let worker = fx.user("Wendy Floor", Role::FloorUser).await;
    let item = fx.item_assigned_to("QR-800", ItemType::Monitor, &worker).await;

    let err = scan_item(&fx.state, &worker, scan("QR-800", ActionType::ScanIn))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));

    let events = store
        .list_for_item(&item.id, DateRange::default(), 10)
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action_type, ActionType::ScanIn);

    let key = DateKey::from_timestamp(fx.clock.now());
    let aggregate = ActivityRepository::get(store.as_ref(), &worker.user_id, key)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(aggregate.total_actions, 1);
    assert!(UsageRepository::get(store.as_ref(), &worker.user_id, key)
        .await
        .unwrap()
        .is_none());
    assert_eq!(fx.state.metrics.pipeline_failures(), 1);
    assert_eq!(fx.state.metrics.partial_failures(), 1);
}
