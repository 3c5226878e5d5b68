// Location value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "Floor 1")]
    Floor1,
    #[serde(rename = "Floor 2")]
    Floor2,
    #[serde(rename = "Floor 3")]
    Floor3,
    Repair,
    Storage,
    Disposed,
}

impl Location {
    pub const ALL: [Location; 6] = [
        Location::Floor1,
        Location::Floor2,
        Location::Floor3,
        Location::Repair,
        Location::Storage,
        Location::Disposed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Floor1 => "Floor 1",
            Location::Floor2 => "Floor 2",
            Location::Floor3 => "Floor 3",
            Location::Repair => "Repair",
            Location::Storage => "Storage",
            Location::Disposed => "Disposed",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Location::ALL
            .into_iter()
            .find(|location| location.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::InvalidValue {
                field: "location",
                value: s.to_string(),
            })
    }
}
