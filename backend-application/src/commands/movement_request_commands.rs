use tracing::info;

use backend_domain::{
    ActionType, Actor, ItemId, Location, MovementRequest, RequestId, RequestStatus,
    ReviewDecision,
};

use super::item_commands::load_item;
use crate::access::{require_item_owner, require_role, ADMIN_ONLY, ADMIN_OR_FLOOR};
use crate::{AppError, AppState, PipelineRecord};

const DEFAULT_REVIEW_LOCATION: Location = Location::Storage;

#[derive(Debug, Clone)]
pub struct CreateRequestCommand {
    pub item_id: ItemId,
    pub action: ActionType,
    pub reason: String,
    pub location: Location,
}

#[derive(Debug, Clone)]
pub struct ReviewRequestCommand {
    pub request_id: RequestId,
    pub decision: ReviewDecision,
    pub location: Option<Location>,
}

pub async fn create_request(
    state: &AppState,
    actor: &Actor,
    command: CreateRequestCommand,
) -> Result<MovementRequest, AppError> {
    require_role(actor, ADMIN_OR_FLOOR)?;
    if !command.action.is_movement_request() {
        return Err(AppError::BadRequest(format!(
            "invalid action type '{}'",
            command.action
        )));
    }
    let reason = command.reason.trim().to_string();
    if reason.is_empty() {
        return Err(AppError::BadRequest("reason is required".to_string()));
    }

    let item = load_item(state, &command.item_id).await?;
    require_item_owner(actor, &item)?;

    let request = MovementRequest::pending(
        item.id.clone(),
        actor.user_id.clone(),
        command.action,
        reason.clone(),
        state.clock.now(),
    );
    state.request_repo.insert(&request).await?;

    state
        .pipeline
        .record(
            PipelineRecord::new(item.id, actor.user_id.clone(), command.action, command.location)
                .with_remarks(reason),
        )
        .await?;

    info!(request_id = %request.id, action = %request.action, "movement request filed");
    Ok(request)
}

/// Decides a pending request exactly once. Approval applies the action's
/// status to the item before the APPROVED event is written. Only the status
/// field is written, so a concurrent reassignment survives the review.
pub async fn review_request(
    state: &AppState,
    actor: &Actor,
    command: ReviewRequestCommand,
) -> Result<MovementRequest, AppError> {
    require_role(actor, ADMIN_ONLY)?;

    let existing = state
        .request_repo
        .get(&command.request_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("movement request {}", command.request_id)))?;
    if existing.status != RequestStatus::Pending {
        return Err(AppError::Conflict(format!(
            "request already reviewed ({})",
            existing.status.as_str()
        )));
    }
    let item = load_item(state, &existing.item_id).await?;

    let now = state.clock.now();
    let reviewed = state
        .request_repo
        .complete_review(&command.request_id, command.decision, &actor.user_id, now)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("movement request {}", command.request_id)))?;

    let location = command.location.unwrap_or(DEFAULT_REVIEW_LOCATION);
    let remarks = match command.decision {
        ReviewDecision::Approved => {
            if let Some(status) = reviewed.action.approved_status() {
                state
                    .item_repo
                    .set_status(&item.id, status, now)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("item {}", item.id)))?;
            }
            format!("Request approved by admin {}", actor.user_id)
        }
        ReviewDecision::Rejected => format!("Request rejected by admin {}", actor.user_id),
    };

    state
        .pipeline
        .record(
            PipelineRecord::new(
                item.id.clone(),
                reviewed.user_id.clone(),
                command.decision.action_type(),
                location,
            )
            .with_remarks(remarks)
            .with_item_type(item.item_type),
        )
        .await?;

    info!(
        request_id = %reviewed.id,
        status = reviewed.status.as_str(),
        "movement request reviewed"
    );
    Ok(reviewed)
}
