use backend_domain::{Actor, MovementRequest, RequestFilter, RequestListQuery, Role};

use super::{parse_optional, DEFAULT_LIST_LIMIT};
use crate::{AppError, AppState};

pub async fn list_requests(
    state: &AppState,
    actor: &Actor,
    query: RequestListQuery,
) -> Result<Vec<MovementRequest>, AppError> {
    let filter = RequestFilter {
        user_id: (actor.role == Role::FloorUser).then(|| actor.user_id.clone()),
        status: parse_optional(query.status)?,
        limit: DEFAULT_LIST_LIMIT,
    };
    Ok(state.request_repo.list(&filter).await?)
}
