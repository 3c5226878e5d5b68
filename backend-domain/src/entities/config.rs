// Runtime configuration shared with the application layer

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub data_dir: String,
    pub snapshot_interval_seconds: u64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3250".to_string(),
            api_token: None,
            data_dir: "./data".to_string(),
            snapshot_interval_seconds: 60,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStoreKind {
    #[default]
    Memory,
    Clickhouse,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub event_store: EventStoreKind,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}
