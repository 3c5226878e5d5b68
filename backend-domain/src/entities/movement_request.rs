// Movement request workflow entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{ActionType, ItemId, RequestId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            _ => Err(DomainError::InvalidValue {
                field: "status",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl ReviewDecision {
    pub fn status(&self) -> RequestStatus {
        match self {
            ReviewDecision::Approved => RequestStatus::Approved,
            ReviewDecision::Rejected => RequestStatus::Rejected,
        }
    }

    pub fn action_type(&self) -> ActionType {
        match self {
            ReviewDecision::Approved => ActionType::Approved,
            ReviewDecision::Rejected => ActionType::Rejected,
        }
    }
}

impl std::str::FromStr for ReviewDecision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approved" => Ok(ReviewDecision::Approved),
            "rejected" => Ok(ReviewDecision::Rejected),
            _ => Err(DomainError::InvalidValue {
                field: "status",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementRequest {
    pub id: RequestId,
    pub item_id: ItemId,
    pub user_id: UserId,
    pub action: ActionType,
    pub reason: String,
    pub status: RequestStatus,
    pub requested_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl MovementRequest {
    pub fn pending(
        item_id: ItemId,
        user_id: UserId,
        action: ActionType,
        reason: String,
        requested_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RequestId::generate(),
            item_id,
            user_id,
            action,
            reason,
            status: RequestStatus::Pending,
            requested_at,
            reviewed_by: None,
            reviewed_at: None,
        }
    }

    /// Moves a pending request to its final state. Any later call fails and
    /// leaves the first decision intact.
    pub fn review(
        &mut self,
        decision: ReviewDecision,
        reviewer: UserId,
        at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        if self.status != RequestStatus::Pending {
            return Err(DomainError::AlreadyReviewed(self.status.as_str().to_string()));
        }
        self.status = decision.status();
        self.reviewed_by = Some(reviewer);
        self.reviewed_at = Some(at);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub user_id: Option<UserId>,
    pub status: Option<RequestStatus>,
    pub limit: usize,
}

impl RequestFilter {
    pub fn matches(&self, request: &MovementRequest) -> bool {
        self.user_id.as_ref().map_or(true, |user| &request.user_id == user)
            && self.status.map_or(true, |status| request.status == status)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestListQuery {
    pub status: Option<String>,
}
