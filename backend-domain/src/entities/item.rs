// Item entity
// Current-state projection of a physical piece of equipment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::{ItemId, ItemStatus, ItemType, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub qr_code: String,
    pub identity_code: String,
    pub item_type: ItemType,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn create(new_item: NewItem, now: DateTime<Utc>) -> Self {
        Self {
            id: ItemId::generate(),
            qr_code: new_item.qr_code,
            identity_code: new_item.identity_code,
            item_type: new_item.item_type,
            status: new_item.status,
            assigned_user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_assigned_to(&self, user_id: &UserId) -> bool {
        self.assigned_user_id.as_ref() == Some(user_id)
    }

    pub fn assign_to(&mut self, user_id: UserId, now: DateTime<Utc>) {
        self.assigned_user_id = Some(user_id);
        self.status = ItemStatus::Assigned;
        self.updated_at = now;
    }

    pub fn set_status(&mut self, status: ItemStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
    pub qr_code: String,
    pub identity_code: String,
    pub item_type: ItemType,
    #[serde(default)]
    pub status: ItemStatus,
}

impl NewItem {
    /// Trims both codes and upper-cases the identity code.
    pub fn normalized(self) -> Result<Self, DomainError> {
        let qr_code = self.qr_code.trim().to_string();
        if qr_code.is_empty() {
            return Err(DomainError::MissingField("qr_code"));
        }
        let identity_code = normalize_identity_code(&self.identity_code);
        if identity_code.is_empty() {
            return Err(DomainError::MissingField("identity_code"));
        }
        Ok(Self {
            qr_code,
            identity_code,
            item_type: self.item_type,
            status: self.status,
        })
    }
}

pub fn normalize_identity_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// How a scanner identifies an item. A QR code wins over a typed identity code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemLookup {
    QrCode(String),
    IdentityCode(String),
}

impl ItemLookup {
    pub fn from_codes(
        qr_code: Option<String>,
        identity_code: Option<String>,
    ) -> Result<Self, DomainError> {
        let qr_code = qr_code
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        if let Some(qr_code) = qr_code {
            return Ok(ItemLookup::QrCode(qr_code));
        }
        identity_code
            .map(|value| normalize_identity_code(&value))
            .filter(|value| !value.is_empty())
            .map(ItemLookup::IdentityCode)
            .ok_or(DomainError::MissingField("qr_code or identity_code"))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub status: Option<ItemStatus>,
    pub item_type: Option<ItemType>,
    pub assigned_user_id: Option<UserId>,
    pub limit: usize,
}

impl ItemFilter {
    pub fn matches(&self, item: &Item) -> bool {
        self.status.map_or(true, |status| item.status == status)
            && self.item_type.map_or(true, |kind| item.item_type == kind)
            && self
                .assigned_user_id
                .as_ref()
                .map_or(true, |user| item.is_assigned_to(user))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemListQuery {
    pub status: Option<String>,
    pub item_type: Option<String>,
    #[serde(default)]
    pub assigned_to_me: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemStatusCounts {
    pub total: u64,
    pub available: u64,
    pub assigned: u64,
    pub repair: u64,
    pub disposed: u64,
    pub borrowed: u64,
}

impl ItemStatusCounts {
    pub fn record(&mut self, status: ItemStatus) {
        self.total += 1;
        match status {
            ItemStatus::Available => self.available += 1,
            ItemStatus::Assigned => self.assigned += 1,
            ItemStatus::Repair => self.repair += 1,
            ItemStatus::Disposed => self.disposed += 1,
            ItemStatus::Borrowed => self.borrowed += 1,
        }
    }
}
