use std::sync::Arc;

use backend_domain::ports::{
    ActivityRepository, Clock, EventRepository, ItemRepository, MovementRequestRepository,
    UsageRepository, UserRepository,
};
use backend_domain::RuntimeConfig;

use crate::{Metrics, WritePipeline};

/// Store handles the application runs against, constructed once at startup.
#[derive(Clone)]
pub struct Stores {
    pub events: Arc<dyn EventRepository>,
    pub activity: Arc<dyn ActivityRepository>,
    pub usage: Arc<dyn UsageRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub requests: Arc<dyn MovementRequestRepository>,
    pub users: Arc<dyn UserRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub event_repo: Arc<dyn EventRepository>,
    pub activity_repo: Arc<dyn ActivityRepository>,
    pub usage_repo: Arc<dyn UsageRepository>,
    pub item_repo: Arc<dyn ItemRepository>,
    pub request_repo: Arc<dyn MovementRequestRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub clock: Arc<dyn Clock>,
    pub pipeline: Arc<WritePipeline>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: RuntimeConfig, stores: Stores, clock: Arc<dyn Clock>) -> Self {
        let metrics = Arc::new(Metrics::default());
        let pipeline = Arc::new(WritePipeline::new(
            stores.events.clone(),
            stores.activity.clone(),
            stores.usage.clone(),
            clock.clone(),
            metrics.clone(),
        ));
        Self {
            config,
            event_repo: stores.events,
            activity_repo: stores.activity,
            usage_repo: stores.usage,
            item_repo: stores.items,
            request_repo: stores.requests,
            user_repo: stores.users,
            clock,
            pipeline,
            metrics,
        }
    }
}
