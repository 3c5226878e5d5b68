use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clickhouse::Client;
use tracing::info;

use backend_application::AppState;
use backend_domain::{DbConfig, EventStoreKind};
use backend_infrastructure::{AppConfig, ClickhouseEventRepository, MemoryStore, SystemClock};

pub struct AppContext {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

impl AppContext {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config();

        let store = Arc::new(MemoryStore::open(Path::new(&runtime_config.data_dir)).await?);
        let mut stores = store.stores();
        if db_config.event_store == EventStoreKind::Clickhouse {
            stores.events = Arc::new(connect_clickhouse(&db_config).await?);
            info!(url = %db_config.clickhouse_url, "event log stored in clickhouse");
        }

        let state = AppState::new(runtime_config, stores, Arc::new(SystemClock));
        Ok(Self { state, store })
    }
}

async fn connect_clickhouse(db_config: &DbConfig) -> Result<ClickhouseEventRepository> {
    let mut clickhouse = Client::default()
        .with_url(&db_config.clickhouse_url)
        .with_database(&db_config.clickhouse_database);
    if let Some(user) = &db_config.clickhouse_user {
        clickhouse = clickhouse.with_user(user);
    }
    if let Some(password) = &db_config.clickhouse_password {
        clickhouse = clickhouse.with_password(password);
    }

    let repo = ClickhouseEventRepository::new(clickhouse, db_config.clickhouse_database.clone());
    repo.ensure_schema().await?;
    Ok(repo)
}
