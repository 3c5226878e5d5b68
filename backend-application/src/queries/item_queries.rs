use backend_domain::{Actor, Item, ItemFilter, ItemId, ItemListQuery, Role};

use super::{parse_optional, DEFAULT_LIST_LIMIT};
use crate::{AppError, AppState};

pub async fn list_items(
    state: &AppState,
    actor: &Actor,
    query: ItemListQuery,
) -> Result<Vec<Item>, AppError> {
    let mut filter = ItemFilter {
        status: parse_optional(query.status)?,
        item_type: parse_optional(query.item_type)?,
        assigned_user_id: None,
        limit: DEFAULT_LIST_LIMIT,
    };
    if actor.role == Role::FloorUser || query.assigned_to_me {
        filter.assigned_user_id = Some(actor.user_id.clone());
    }
    Ok(state.item_repo.list(&filter).await?)
}

pub async fn get_item(state: &AppState, item_id: &ItemId) -> Result<Item, AppError> {
    state
        .item_repo
        .get(item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("item {}", item_id)))
}
