use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clickhouse::{Client, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use backend_domain::{
    DateRange, EventId, EventRepository, ItemEvent, ItemId, StoreError, StoreResult, UserId,
};

use crate::utils::{to_offset_datetime, to_utc};

const SELECT_COLUMNS: &str =
    "SELECT event_time, event_id, item_id, user_id, action_type, date_key, location, remarks FROM item_logs";

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct ItemLogRow {
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub event_time: OffsetDateTime,
    pub event_id: String,
    pub item_id: String,
    pub user_id: String,
    pub action_type: String,
    pub date_key: String,
    pub location: String,
    pub remarks: String,
}

impl TryFrom<&ItemEvent> for ItemLogRow {
    type Error = anyhow::Error;

    fn try_from(event: &ItemEvent) -> Result<Self> {
        Ok(Self {
            event_time: to_offset_datetime(event.timestamp)?,
            event_id: event.id.to_string(),
            item_id: event.item_id.to_string(),
            user_id: event.user_id.to_string(),
            action_type: event.action_type.to_string(),
            date_key: event.date_key.to_string(),
            location: event.location.to_string(),
            remarks: event.remarks.clone().unwrap_or_default(),
        })
    }
}

impl TryFrom<ItemLogRow> for ItemEvent {
    type Error = anyhow::Error;

    fn try_from(row: ItemLogRow) -> Result<Self> {
        Ok(ItemEvent {
            id: EventId::from(row.event_id),
            item_id: ItemId::from(row.item_id),
            user_id: UserId::from(row.user_id),
            action_type: row.action_type.parse()?,
            timestamp: to_utc(row.event_time)?,
            date_key: row.date_key.parse()?,
            location: row.location.parse()?,
            remarks: Some(row.remarks).filter(|remarks| !remarks.is_empty()),
        })
    }
}

/// Append-only `item_logs` table. Rows are never updated or deleted.
#[derive(Clone)]
pub struct ClickhouseEventRepository {
    client: Client,
    database: String,
}

impl ClickhouseEventRepository {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        // The target database may not exist yet, so create it from `default`.
        self.client
            .clone()
            .with_database("default")
            .query(&create_db)
            .execute()
            .await?;

        let create_logs = r#"
CREATE TABLE IF NOT EXISTS item_logs (
    event_time DateTime64(3),
    event_id String,
    item_id String,
    user_id String,
    action_type LowCardinality(String),
    date_key String,
    location LowCardinality(String),
    remarks String
) ENGINE = MergeTree
PARTITION BY date_key
ORDER BY (item_id, event_time)
"#;
        self.client.query(create_logs).execute().await?;
        Ok(())
    }

    async fn fetch(&self, query: clickhouse::query::Query) -> StoreResult<Vec<ItemEvent>> {
        let rows = query.fetch_all::<ItemLogRow>().await.map_err(backend)?;
        rows.into_iter()
            .map(|row| ItemEvent::try_from(row).map_err(StoreError::from))
            .collect()
    }
}

fn backend(err: clickhouse::error::Error) -> StoreError {
    StoreError::Backend(anyhow!(err))
}

#[async_trait]
impl EventRepository for ClickhouseEventRepository {
    async fn append(&self, event: &ItemEvent) -> StoreResult<()> {
        let mut insert = self.client.insert("item_logs").map_err(backend)?;
        let row = ItemLogRow::try_from(event)?;
        insert.write(&row).await.map_err(backend)?;
        insert.end().await.map_err(backend)?;
        Ok(())
    }

    async fn list_for_item(
        &self,
        item_id: &ItemId,
        range: DateRange,
        limit: usize,
    ) -> StoreResult<Vec<ItemEvent>> {
        let mut sql = format!("{} WHERE item_id = ?", SELECT_COLUMNS);
        if range.start.is_some() {
            sql.push_str(" AND date_key >= ?");
        }
        if range.end.is_some() {
            sql.push_str(" AND date_key <= ?");
        }
        sql.push_str(" ORDER BY event_time DESC LIMIT ?");

        let mut query = self.client.query(&sql).bind(item_id.as_str());
        if let Some(start) = range.start {
            query = query.bind(start.to_string());
        }
        if let Some(end) = range.end {
            query = query.bind(end.to_string());
        }
        self.fetch(query.bind(limit as u64)).await
    }

    async fn list_since(&self, since: DateTime<Utc>, limit: usize) -> StoreResult<Vec<ItemEvent>> {
        let sql = format!(
            "{} WHERE event_time >= fromUnixTimestamp64Milli(?) ORDER BY event_time DESC LIMIT ?",
            SELECT_COLUMNS
        );
        let query = self
            .client
            .query(&sql)
            .bind(since.timestamp_millis())
            .bind(limit as u64);
        self.fetch(query).await
    }

    async fn ping(&self) -> StoreResult<()> {
        let _: u8 = self
            .client
            .query("SELECT toUInt8(1)")
            .fetch_one()
            .await
            .map_err(backend)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::{ActionType, Location};
    use chrono::TimeZone;

    #[test]
    fn rows_map_back_to_events() {
        let at = Utc.with_ymd_and_hms(2024, 6, 3, 23, 59, 59).unwrap();
        let event = ItemEvent::new(
            ItemId::from("item-1"),
            UserId::from("user-1"),
            ActionType::RequestTransferFloor2,
            Location::Floor3,
            None,
            at,
        );
        let row = ItemLogRow::try_from(&event).unwrap();
        assert_eq!(row.action_type, "REQUEST_TRANSFER_FLOOR_2");
        assert_eq!(row.location, "Floor 3");
        assert_eq!(row.date_key, "2024-06-03");
        assert_eq!(row.remarks, "");

        let restored = ItemEvent::try_from(row).unwrap();
        assert_eq!(restored, event);
    }

    #[test]
    fn event_beyond_column_range_is_not_written() {
        let at = Utc.with_ymd_and_hms(20_000, 1, 1, 0, 0, 0).unwrap();
        let event = ItemEvent::new(
            ItemId::from("item-1"),
            UserId::from("user-1"),
            ActionType::ScanIn,
            Location::Storage,
            None,
            at,
        );
        assert!(ItemLogRow::try_from(&event).is_err());
    }

    #[test]
    fn unknown_action_in_row_is_rejected() {
        let row = ItemLogRow {
            event_time: OffsetDateTime::UNIX_EPOCH,
            event_id: "e".into(),
            item_id: "i".into(),
            user_id: "u".into(),
            action_type: "TELEPORT".into(),
            date_key: "1970-01-01".into(),
            location: "Storage".into(),
            remarks: String::new(),
        };
        assert!(ItemEvent::try_from(row).is_err());
    }
}
