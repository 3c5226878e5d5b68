// Action vocabulary for item movement events

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::ItemStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    ScanIn,
    ScanOut,
    RequestRepair,
    RequestDispose,
    RequestBorrow,
    #[serde(rename = "REQUEST_TRANSFER_FLOOR_1")]
    RequestTransferFloor1,
    #[serde(rename = "REQUEST_TRANSFER_FLOOR_2")]
    RequestTransferFloor2,
    #[serde(rename = "REQUEST_TRANSFER_FLOOR_3")]
    RequestTransferFloor3,
    Approved,
    Rejected,
    Assigned,
    Unassigned,
}

impl ActionType {
    pub const ALL: [ActionType; 12] = [
        ActionType::ScanIn,
        ActionType::ScanOut,
        ActionType::RequestRepair,
        ActionType::RequestDispose,
        ActionType::RequestBorrow,
        ActionType::RequestTransferFloor1,
        ActionType::RequestTransferFloor2,
        ActionType::RequestTransferFloor3,
        ActionType::Approved,
        ActionType::Rejected,
        ActionType::Assigned,
        ActionType::Unassigned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::ScanIn => "SCAN_IN",
            ActionType::ScanOut => "SCAN_OUT",
            ActionType::RequestRepair => "REQUEST_REPAIR",
            ActionType::RequestDispose => "REQUEST_DISPOSE",
            ActionType::RequestBorrow => "REQUEST_BORROW",
            ActionType::RequestTransferFloor1 => "REQUEST_TRANSFER_FLOOR_1",
            ActionType::RequestTransferFloor2 => "REQUEST_TRANSFER_FLOOR_2",
            ActionType::RequestTransferFloor3 => "REQUEST_TRANSFER_FLOOR_3",
            ActionType::Approved => "APPROVED",
            ActionType::Rejected => "REJECTED",
            ActionType::Assigned => "ASSIGNED",
            ActionType::Unassigned => "UNASSIGNED",
        }
    }

    pub fn is_scan(&self) -> bool {
        matches!(self, ActionType::ScanIn | ActionType::ScanOut)
    }

    /// Actions a user may file as a movement request.
    pub fn is_movement_request(&self) -> bool {
        matches!(
            self,
            ActionType::RequestRepair
                | ActionType::RequestDispose
                | ActionType::RequestBorrow
                | ActionType::RequestTransferFloor1
                | ActionType::RequestTransferFloor2
                | ActionType::RequestTransferFloor3
        )
    }

    /// Item status an approved request moves the item into. Transfers only
    /// change location and keep the current status.
    pub fn approved_status(&self) -> Option<ItemStatus> {
        match self {
            ActionType::RequestRepair => Some(ItemStatus::Repair),
            ActionType::RequestDispose => Some(ItemStatus::Disposed),
            ActionType::RequestBorrow => Some(ItemStatus::Borrowed),
            _ => None,
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        ActionType::ALL
            .into_iter()
            .find(|action| action.as_str() == wanted)
            .ok_or_else(|| DomainError::InvalidValue {
                field: "action",
                value: s.to_string(),
            })
    }
}
