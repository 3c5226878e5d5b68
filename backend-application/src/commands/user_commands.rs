use tracing::info;

use backend_domain::{Actor, NewUser, StoreError, User};

use crate::access::{require_role, ADMIN_ONLY};
use crate::{AppError, AppState};

pub async fn create_user(state: &AppState, actor: &Actor, new_user: NewUser) -> Result<User, AppError> {
    require_role(actor, ADMIN_ONLY)?;
    let user = new_user.into_user(state.clock.now())?;
    state.user_repo.insert(&user).await.map_err(|err| match err {
        StoreError::Duplicate(_) => {
            AppError::Conflict("user with this email already exists".to_string())
        }
        other => other.into(),
    })?;
    info!(user_id = %user.id, role = %user.role, "user created");
    Ok(user)
}
