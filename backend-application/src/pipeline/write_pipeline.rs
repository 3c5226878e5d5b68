use std::sync::Arc;

use tracing::{debug, error, warn};

use backend_domain::ports::{ActivityRepository, Clock, EventRepository, UsageRepository};
use backend_domain::{
    ActionType, ActivityEntry, ItemEvent, ItemId, ItemType, Location, StoreError, UserId,
};

use super::usage_tracking::{apply_scan, ScanOutcome};
use crate::Metrics;

/// One movement to record. `item_type` enables usage tracking for scans.
#[derive(Debug, Clone)]
pub struct PipelineRecord {
    pub item_id: ItemId,
    pub user_id: UserId,
    pub action_type: ActionType,
    pub location: Location,
    pub remarks: Option<String>,
    pub item_type: Option<ItemType>,
}

impl PipelineRecord {
    pub fn new(item_id: ItemId, user_id: UserId, action_type: ActionType, location: Location) -> Self {
        Self {
            item_id,
            user_id,
            action_type,
            location,
            remarks: None,
            item_type: None,
        }
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    pub fn with_item_type(mut self, item_type: ItemType) -> Self {
        self.item_type = Some(item_type);
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Activity,
    Usage,
}

impl Stage {
    fn as_str(&self) -> &'static str {
        match self {
            Stage::Activity => "activity",
            Stage::Usage => "usage",
        }
    }
}

/// Writes the canonical event, then the activity aggregate, then (for scans
/// with a known item type) the usage snapshot.
///
/// The three writes are not one transaction. A failure after the event append
/// is logged and propagated; the appended event is neither retried nor undone.
pub struct WritePipeline {
    events: Arc<dyn EventRepository>,
    activity: Arc<dyn ActivityRepository>,
    usage: Arc<dyn UsageRepository>,
    clock: Arc<dyn Clock>,
    metrics: Arc<Metrics>,
}

impl WritePipeline {
    pub fn new(
        events: Arc<dyn EventRepository>,
        activity: Arc<dyn ActivityRepository>,
        usage: Arc<dyn UsageRepository>,
        clock: Arc<dyn Clock>,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            events,
            activity,
            usage,
            clock,
            metrics,
        }
    }

    pub async fn record(&self, record: PipelineRecord) -> Result<ItemEvent, StoreError> {
        let timestamp = self.clock.now();
        let event = ItemEvent::new(
            record.item_id,
            record.user_id,
            record.action_type,
            record.location,
            record.remarks,
            timestamp,
        );

        if let Err(err) = self.events.append(&event).await {
            self.metrics.record_pipeline_failure();
            error!(
                item_id = %event.item_id,
                action = %event.action_type,
                "event append failed: {}",
                err
            );
            return Err(err);
        }

        if let Err(err) = self
            .activity
            .record_activity(&event.user_id, event.date_key, ActivityEntry::from(&event))
            .await
        {
            return Err(self.partial_failure(&event, Stage::Activity, err));
        }

        if let Some(item_type) = record.item_type.filter(|_| event.action_type.is_scan()) {
            let outcome = apply_scan(
                self.usage.as_ref(),
                &event.user_id,
                &event.item_id,
                item_type,
                event.action_type,
                event.timestamp,
                event.date_key,
            )
            .await;
            match outcome {
                Ok(ScanOutcome::Opened) => self.metrics.record_usage_opened(),
                Ok(ScanOutcome::Closed(entry)) => {
                    self.metrics.record_usage_closed();
                    debug!(
                        item_id = %event.item_id,
                        user_id = %event.user_id,
                        minutes = entry.duration_minutes.unwrap_or_default(),
                        "usage entry closed"
                    );
                }
                Ok(ScanOutcome::Unmatched) => {
                    self.metrics.record_usage_unmatched();
                    warn!(
                        item_id = %event.item_id,
                        user_id = %event.user_id,
                        date = %event.date_key,
                        "scan out without open usage entry"
                    );
                }
                Ok(ScanOutcome::Ignored) => {}
                Err(err) => return Err(self.partial_failure(&event, Stage::Usage, err)),
            }
        }

        self.metrics.record_pipeline_event();
        debug!(
            event_id = %event.id,
            item_id = %event.item_id,
            user_id = %event.user_id,
            action = %event.action_type,
            "event recorded"
        );
        Ok(event)
    }

    fn partial_failure(&self, event: &ItemEvent, stage: Stage, err: StoreError) -> StoreError {
        self.metrics.record_partial_failure();
        error!(
            event_id = %event.id,
            item_id = %event.item_id,
            user_id = %event.user_id,
            action = %event.action_type,
            stage = stage.as_str(),
            "event stored but view update failed: {}",
            err
        );
        err
    }
}
