// Item type and status value objects

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Headset,
    Monitor,
    Keyboard,
    Mouse,
    #[serde(rename = "System Unit")]
    SystemUnit,
    #[serde(rename = "AVR")]
    Avr,
    #[serde(rename = "UPS")]
    Ups,
}

impl ItemType {
    pub const ALL: [ItemType; 7] = [
        ItemType::Headset,
        ItemType::Monitor,
        ItemType::Keyboard,
        ItemType::Mouse,
        ItemType::SystemUnit,
        ItemType::Avr,
        ItemType::Ups,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Headset => "Headset",
            ItemType::Monitor => "Monitor",
            ItemType::Keyboard => "Keyboard",
            ItemType::Mouse => "Mouse",
            ItemType::SystemUnit => "System Unit",
            ItemType::Avr => "AVR",
            ItemType::Ups => "UPS",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ItemType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::InvalidValue {
                field: "item_type",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Available,
    Assigned,
    Repair,
    Disposed,
    Borrowed,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 5] = [
        ItemStatus::Available,
        ItemStatus::Assigned,
        ItemStatus::Repair,
        ItemStatus::Disposed,
        ItemStatus::Borrowed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Available => "available",
            ItemStatus::Assigned => "assigned",
            ItemStatus::Repair => "repair",
            ItemStatus::Disposed => "disposed",
            ItemStatus::Borrowed => "borrowed",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ItemStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| DomainError::InvalidValue {
                field: "status",
                value: s.to_string(),
            })
    }
}
