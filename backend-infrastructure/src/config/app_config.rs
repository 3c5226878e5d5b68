use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, EventStoreKind, RuntimeConfig};

pub const CONFIG_ENV: &str = "EQUIPTRACK_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "./config.toml";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub event_store: EventStoreKind,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub data_dir: String,
    pub snapshot_interval_seconds: u64,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub log_dir: Option<String>,
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let runtime = RuntimeConfig::default();
        Self {
            bind_addr: runtime.bind_addr,
            api_token: None,
            event_store: EventStoreKind::Memory,
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "equiptrack".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            data_dir: runtime.data_dir,
            snapshot_interval_seconds: runtime.snapshot_interval_seconds,
            max_body_bytes: runtime.max_body_bytes,
            request_timeout_seconds: runtime.request_timeout_seconds,
            log_dir: None,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Loads from `path`, falling back to `EQUIPTRACK_CONFIG` and then
    /// `./config.toml`. A missing file means defaults plus env overrides.
    pub async fn load(path: Option<&str>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_string(),
            None => env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()),
        };
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            Self::from_toml(&content)?
        } else {
            warn!(path = %path, "config file not found, using defaults");
            AppConfig::default()
        };
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn normalize(&mut self) {
        self.api_token = non_blank(self.api_token.take());
        self.clickhouse_user = non_blank(self.clickhouse_user.take());
        self.clickhouse_password = non_blank(self.clickhouse_password.take());
        self.log_dir = non_blank(self.log_dir.take());
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.data_dir = resolve_path(base, &self.data_dir);
        if let Some(log_dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, log_dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        if self.data_dir.trim().is_empty() {
            return Err(anyhow!("data_dir must not be empty"));
        }
        if self.event_store == EventStoreKind::Clickhouse && self.clickhouse_url.trim().is_empty() {
            return Err(anyhow!("clickhouse_url is required when event_store = \"clickhouse\""));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            data_dir: self.data_dir.clone(),
            snapshot_interval_seconds: self.snapshot_interval_seconds,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            event_store: self.event_store,
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("EQUIPTRACK_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("EQUIPTRACK_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("EQUIPTRACK_EVENT_STORE") {
            match value.trim().to_ascii_lowercase().as_str() {
                "memory" => self.event_store = EventStoreKind::Memory,
                "clickhouse" => self.event_store = EventStoreKind::Clickhouse,
                other => warn!(value = other, "ignoring unknown EQUIPTRACK_EVENT_STORE"),
            }
        }
        if let Ok(value) = env::var("EQUIPTRACK_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Ok(value) = env::var("EQUIPTRACK_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("EQUIPTRACK_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("EQUIPTRACK_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Ok(value) = env::var("EQUIPTRACK_DATA_DIR") {
            self.data_dir = value;
        }
        if let Ok(value) = env::var("EQUIPTRACK_SNAPSHOT_INTERVAL_SECONDS") {
            self.snapshot_interval_seconds = value.parse().unwrap_or(self.snapshot_interval_seconds);
        }
        if let Ok(value) = env::var("EQUIPTRACK_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("EQUIPTRACK_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("EQUIPTRACK_LOG_DIR") {
            self.log_dir = Some(value);
        }
        if let Ok(value) = env::var("EQUIPTRACK_LOG_JSON") {
            self.log_json = value.parse().unwrap_or(self.log_json);
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
