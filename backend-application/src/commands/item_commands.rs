use tracing::info;

use backend_domain::{
    ActionType, Actor, Item, ItemId, ItemLookup, Location, NewItem, StoreError, UserId,
};

use crate::access::{require_item_owner, require_role, ADMIN_ONLY, ADMIN_OR_FLOOR};
use crate::{AppError, AppState, PipelineRecord};

#[derive(Debug, Clone)]
pub struct AssignItemCommand {
    pub item_id: ItemId,
    pub user_id: UserId,
    pub location: Location,
}

#[derive(Debug, Clone)]
pub struct ScanItemCommand {
    pub lookup: ItemLookup,
    pub action: ActionType,
    pub location: Location,
    pub remarks: Option<String>,
}

pub async fn create_item(state: &AppState, actor: &Actor, new_item: NewItem) -> Result<Item, AppError> {
    require_role(actor, ADMIN_ONLY)?;
    let new_item = new_item.normalized()?;
    let item = Item::create(new_item, state.clock.now());
    state.item_repo.insert(&item).await.map_err(|err| match err {
        StoreError::Duplicate(_) => {
            AppError::Conflict("qr code or identity code already exists".to_string())
        }
        other => other.into(),
    })?;
    info!(item_id = %item.id, qr_code = %item.qr_code, "item created");
    Ok(item)
}

/// Hands an item to a user. A previous assignee first gets an UNASSIGNED
/// event. The item record is saved before the ASSIGNED event is written.
pub async fn assign_item(
    state: &AppState,
    actor: &Actor,
    command: AssignItemCommand,
) -> Result<Item, AppError> {
    require_role(actor, ADMIN_ONLY)?;
    let item = load_item(state, &command.item_id).await?;

    if let Some(previous) = item.assigned_user_id.clone() {
        state
            .pipeline
            .record(
                PipelineRecord::new(item.id.clone(), previous, ActionType::Unassigned, command.location)
                    .with_remarks(format!("Unassigned by admin {}", actor.user_id)),
            )
            .await?;
    }

    let item = state
        .item_repo
        .assign(&item.id, &command.user_id, state.clock.now())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {}", item.id)))?;

    state
        .pipeline
        .record(
            PipelineRecord::new(item.id.clone(), command.user_id, ActionType::Assigned, command.location)
                .with_remarks(format!("Assigned by admin {}", actor.user_id))
                .with_item_type(item.item_type),
        )
        .await?;

    info!(item_id = %item.id, assignee = ?item.assigned_user_id, "item assigned");
    Ok(item)
}

/// Records a scan. SCAN_IN also makes the scanning user the assignee,
/// whoever held the item before.
pub async fn scan_item(
    state: &AppState,
    actor: &Actor,
    command: ScanItemCommand,
) -> Result<Item, AppError> {
    require_role(actor, ADMIN_OR_FLOOR)?;
    if !command.action.is_scan() {
        return Err(AppError::BadRequest(format!(
            "invalid action type '{}'",
            command.action
        )));
    }

    let found = match &command.lookup {
        ItemLookup::QrCode(code) => state.item_repo.find_by_qr_code(code).await?,
        ItemLookup::IdentityCode(code) => state.item_repo.find_by_identity_code(code).await?,
    };
    let item = found.ok_or_else(|| AppError::NotFound("item".to_string()))?;
    require_item_owner(actor, &item)?;

    let mut record = PipelineRecord::new(
        item.id.clone(),
        actor.user_id.clone(),
        command.action,
        command.location,
    )
    .with_item_type(item.item_type);
    record.remarks = backend_domain::normalize_optional_text(command.remarks);
    state.pipeline.record(record).await?;

    if command.action == ActionType::ScanIn {
        return state
            .item_repo
            .assign(&item.id, &actor.user_id, state.clock.now())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("item {}", item.id)));
    }
    Ok(item)
}

pub(crate) async fn load_item(state: &AppState, item_id: &ItemId) -> Result<Item, AppError> {
    state
        .item_repo
        .get(item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {}", item_id)))
}
