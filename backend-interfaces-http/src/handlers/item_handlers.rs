use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use backend_application::commands::item_commands::{self, AssignItemCommand, ScanItemCommand};
use backend_application::queries::item_queries;
use backend_application::AppState;
use backend_domain::{Item, ItemId, ItemListQuery, ItemLookup, ItemStatus, NewItem, UserId};

use super::parse_field;
use crate::error::HttpError;
use crate::middleware::authenticate;

#[derive(Debug, Deserialize)]
pub struct CreateItemPayload {
    pub qr_code: String,
    pub identity_code: String,
    pub item_type: String,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AssignItemPayload {
    pub user_id: String,
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct ScanItemPayload {
    pub qr_code: Option<String>,
    pub identity_code: Option<String>,
    pub action_type: String,
    pub location: String,
    pub remarks: Option<String>,
}

pub async fn list_items(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ItemListQuery>,
) -> Result<Json<Vec<Item>>, HttpError> {
    let actor = authenticate(&state.config, &headers)?;
    let items = item_queries::list_items(&state, &actor, query).await?;
    Ok(Json(items))
}

pub async fn get_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<String>,
) -> Result<Json<Item>, HttpError> {
    authenticate(&state.config, &headers)?;
    let item = item_queries::get_item(&state, &ItemId::from(item_id)).await?;
    Ok(Json(item))
}

pub async fn create_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateItemPayload>,
) -> Result<(StatusCode, Json<Item>), HttpError> {
    let actor = authenticate(&state.config, &headers)?;
    let status = match payload.status.as_deref() {
        Some(raw) => parse_field::<ItemStatus>(raw)?,
        None => ItemStatus::default(),
    };
    let new_item = NewItem {
        qr_code: payload.qr_code,
        identity_code: payload.identity_code,
        item_type: parse_field(&payload.item_type)?,
        status,
    };
    let item = item_commands::create_item(&state, &actor, new_item).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn assign_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<String>,
    Json(payload): Json<AssignItemPayload>,
) -> Result<Json<Item>, HttpError> {
    let actor = authenticate(&state.config, &headers)?;
    let user_id = payload.user_id.trim();
    if user_id.is_empty() {
        return Err(HttpError::BadRequest("user_id is required".to_string()));
    }
    let command = AssignItemCommand {
        item_id: ItemId::from(item_id),
        user_id: UserId::from(user_id),
        location: parse_field(&payload.location)?,
    };
    let item = item_commands::assign_item(&state, &actor, command).await?;
    Ok(Json(item))
}

pub async fn scan_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ScanItemPayload>,
) -> Result<Json<Item>, HttpError> {
    let actor = authenticate(&state.config, &headers)?;
    let command = ScanItemCommand {
        lookup: ItemLookup::from_codes(payload.qr_code, payload.identity_code)?,
        action: parse_field(&payload.action_type)?,
        location: parse_field(&payload.location)?,
        remarks: payload.remarks,
    };
    let item = item_commands::scan_item(&state, &actor, command).await?;
    Ok(Json(item))
}
