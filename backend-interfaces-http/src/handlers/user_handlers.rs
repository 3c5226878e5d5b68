use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use backend_application::commands::user_commands;
use backend_application::queries::user_queries;
use backend_application::AppState;
use backend_domain::{NewUser, User, UserListQuery};

use super::parse_field;
use crate::error::HttpError;
use crate::middleware::authenticate;

#[derive(Debug, Deserialize)]
pub struct CreateUserPayload {
    pub email: String,
    pub name: String,
    pub role: String,
    pub employee_id: Option<String>,
}

pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Vec<User>>, HttpError> {
    let actor = authenticate(&state.config, &headers)?;
    let users = user_queries::list_users(&state, &actor, query).await?;
    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateUserPayload>,
) -> Result<(StatusCode, Json<User>), HttpError> {
    let actor = authenticate(&state.config, &headers)?;
    let new_user = NewUser {
        email: payload.email,
        name: payload.name,
        role: parse_field(&payload.role)?,
        employee_id: payload.employee_id,
    };
    let user = user_commands::create_user(&state, &actor, new_user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
