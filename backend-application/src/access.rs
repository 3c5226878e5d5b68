use backend_domain::{Actor, Role};

use crate::AppError;

pub const ADMIN_ONLY: &[Role] = &[Role::Admin];
pub const ADMIN_OR_OWNER: &[Role] = &[Role::Admin, Role::Owner];
pub const ADMIN_OR_FLOOR: &[Role] = &[Role::Admin, Role::FloorUser];

pub fn require_role(actor: &Actor, allowed: &[Role]) -> Result<(), AppError> {
    if actor.has_any_role(allowed) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role {} may not perform this action",
            actor.role
        )))
    }
}

/// Floor users may only act on items currently assigned to them.
pub fn require_item_owner(actor: &Actor, item: &backend_domain::Item) -> Result<(), AppError> {
    if actor.role.is_privileged() || item.is_assigned_to(&actor.user_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden("item not assigned to you".to_string()))
    }
}
