// User directory entry

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::utils::normalize_optional_text;
use crate::value_objects::{Role, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub employee_id: Option<String>,
}

impl NewUser {
    pub fn into_user(self, now: DateTime<Utc>) -> Result<User, DomainError> {
        let email = self.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(DomainError::MissingField("email"));
        }
        let valid = email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);
        if !valid || email.contains(char::is_whitespace) {
            return Err(DomainError::InvalidValue {
                field: "email",
                value: self.email,
            });
        }
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(DomainError::MissingField("name"));
        }
        Ok(User {
            id: UserId::generate(),
            email,
            name,
            role: self.role,
            employee_id: normalize_optional_text(self.employee_id),
            created_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<String>,
}
