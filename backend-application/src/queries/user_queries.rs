use backend_domain::{Actor, User, UserListQuery};

use super::{parse_optional, DEFAULT_LIST_LIMIT};
use crate::access::{require_role, ADMIN_OR_OWNER};
use crate::{AppError, AppState};

pub async fn list_users(
    state: &AppState,
    actor: &Actor,
    query: UserListQuery,
) -> Result<Vec<User>, AppError> {
    require_role(actor, ADMIN_OR_OWNER)?;
    let role = parse_optional(query.role)?;
    Ok(state.user_repo.list(role, DEFAULT_LIST_LIMIT).await?)
}
