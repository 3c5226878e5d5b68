// On-disk snapshot of the in-memory store

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;

use backend_domain::{
    ActivityAggregate, Item, ItemEvent, MovementRequest, UsageSnapshot, User,
};

pub const SNAPSHOT_FILE_NAME: &str = "store.json";
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: u32,
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub events: Vec<ItemEvent>,
    #[serde(default)]
    pub activity: Vec<ActivityAggregate>,
    #[serde(default)]
    pub usage: Vec<UsageSnapshot>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub requests: Vec<MovementRequest>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl StoreSnapshot {
    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.version = SNAPSHOT_VERSION;
        self.saved_at = Some(at);
        self
    }
}

pub fn snapshot_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SNAPSHOT_FILE_NAME)
}

/// Missing files read as an empty store.
pub async fn load_snapshot(path: &Path) -> Result<StoreSnapshot> {
    if !path.exists() {
        return Ok(StoreSnapshot::default());
    }
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("read snapshot {}", path.display()))?;
    let snapshot: StoreSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("parse snapshot {}", path.display()))?;
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(anyhow!(
            "snapshot {} has unsupported version {}",
            path.display(),
            snapshot.version
        ));
    }
    Ok(snapshot)
}

/// Writes to a sibling temp file and renames it over the target, so readers
/// never observe a half-written snapshot.
pub async fn save_snapshot(path: &Path, snapshot: &StoreSnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    let content = serde_json::to_vec(snapshot)?;
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, content)
        .await
        .with_context(|| format!("write snapshot {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .await
        .with_context(|| format!("replace snapshot {}", path.display()))?;
    Ok(())
}
