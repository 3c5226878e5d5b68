#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

use backend_application::{AppState, Stores};
use backend_domain::ports::Clock;
use backend_domain::{
    Actor, Item, ItemRepository, ItemStatus, ItemType, NewItem, Role, RuntimeConfig, User,
    UserId, UserRepository,
};
use backend_infrastructure::MemoryStore;

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub fn at(day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, hour, minute, second).unwrap()
}

pub struct Fixture {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<ManualClock>,
    pub admin: Actor,
    pub owner: Actor,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::with_stores(store.clone(), store.stores()).await
    }

    pub async fn with_stores(store: Arc<MemoryStore>, stores: Stores) -> Self {
        let clock = Arc::new(ManualClock::at(at(3, 9, 0, 0)));
        let state = AppState::new(RuntimeConfig::default(), stores, clock.clone());
        let mut fixture = Self {
            state,
            store,
            clock,
            admin: Actor::new("pending", Role::Admin),
            owner: Actor::new("pending", Role::Owner),
        };
        fixture.admin = fixture.user("Ada Admin", Role::Admin).await;
        fixture.owner = fixture.user("Otto Owner", Role::Owner).await;
        fixture
    }

    /// Inserts a user straight into the store and returns it as an actor.
    pub async fn user(&self, name: &str, role: Role) -> Actor {
        let user = User {
            id: UserId::generate(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            name: name.to_string(),
            role,
            employee_id: None,
            created_at: self.clock.now(),
        };
        UserRepository::insert(self.store.as_ref(), &user).await.unwrap();
        Actor::new(user.id, role)
    }

    pub async fn item(&self, qr_code: &str, item_type: ItemType) -> Item {
        let new_item = NewItem {
            qr_code: qr_code.to_string(),
            identity_code: format!("ID-{}", qr_code),
            item_type,
            status: ItemStatus::Available,
        };
        let item = Item::create(new_item.normalized().unwrap(), self.clock.now());
        ItemRepository::insert(self.store.as_ref(), &item).await.unwrap();
        item
    }

    pub async fn item_assigned_to(&self, qr_code: &str, item_type: ItemType, actor: &Actor) -> Item {
        let mut item = self.item(qr_code, item_type).await;
        item.assign_to(actor.user_id.clone(), self.clock.now());
        self.store.save(&item).await.unwrap();
        item
    }
}
