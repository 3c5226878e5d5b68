use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;

use backend_application::queries::analytics_queries;
use backend_application::AppState;
use backend_domain::{
    Dashboard, DashboardQuery, HistoryQuery, ItemEvent, ItemId, UserActivityDay, UserId,
};

use crate::error::HttpError;
use crate::middleware::authenticate;

pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<Dashboard>, HttpError> {
    let actor = authenticate(&state.config, &headers)?;
    let dashboard = analytics_queries::dashboard(&state, &actor, query).await?;
    Ok(Json(dashboard))
}

pub async fn item_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ItemEvent>>, HttpError> {
    let actor = authenticate(&state.config, &headers)?;
    let history =
        analytics_queries::item_history(&state, &actor, &ItemId::from(item_id), query).await?;
    Ok(Json(history))
}

pub async fn user_activity(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<UserActivityDay>>, HttpError> {
    let actor = authenticate(&state.config, &headers)?;
    let days =
        analytics_queries::user_activity(&state, &actor, &UserId::from(user_id), query).await?;
    Ok(Json(days))
}
