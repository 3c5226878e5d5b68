use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use backend_application::commands::movement_request_commands::{
    self, CreateRequestCommand, ReviewRequestCommand,
};
use backend_application::queries::movement_request_queries;
use backend_application::AppState;
use backend_domain::{ItemId, Location, MovementRequest, RequestId, RequestListQuery};

use super::parse_field;
use crate::error::HttpError;
use crate::middleware::authenticate;

#[derive(Debug, Deserialize)]
pub struct CreateRequestPayload {
    pub item_id: String,
    pub action_type: String,
    pub reason: String,
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequestPayload {
    pub status: String,
    pub location: Option<String>,
}

pub async fn list_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<Vec<MovementRequest>>, HttpError> {
    let actor = authenticate(&state.config, &headers)?;
    let requests = movement_request_queries::list_requests(&state, &actor, query).await?;
    Ok(Json(requests))
}

pub async fn create_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateRequestPayload>,
) -> Result<(StatusCode, Json<MovementRequest>), HttpError> {
    let actor = authenticate(&state.config, &headers)?;
    let command = CreateRequestCommand {
        item_id: ItemId::from(payload.item_id),
        action: parse_field(&payload.action_type)?,
        reason: payload.reason,
        location: parse_field(&payload.location)?,
    };
    let request = movement_request_commands::create_request(&state, &actor, command).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn review_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(request_id): Path<String>,
    Json(payload): Json<ReviewRequestPayload>,
) -> Result<Json<MovementRequest>, HttpError> {
    let actor = authenticate(&state.config, &headers)?;
    let location = match payload.location.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(parse_field::<Location>(raw)?),
        _ => None,
    };
    let command = ReviewRequestCommand {
        request_id: RequestId::from(request_id),
        decision: parse_field(&payload.status)?,
        location,
    };
    let request = movement_request_commands::review_request(&state, &actor, command).await?;
    Ok(Json(request))
}
