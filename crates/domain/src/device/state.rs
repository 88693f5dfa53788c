use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceState {
    /// Device can be handed out
    Available,
    /// Device is assigned; name and brand are locked and it cannot be deleted
    InUse,
    /// Device is retired or parked
    Inactive,
}

impl DeviceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::InUse => "IN_USE",
            Self::Inactive => "INACTIVE",
        }
    }

    pub fn is_in_use(&self) -> bool {
        matches!(self, Self::InUse)
    }
}

impl FromStr for DeviceState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(Self::Available),
            "IN_USE" => Ok(Self::InUse),
            "INACTIVE" => Ok(Self::Inactive),
            other => Err(DomainError::Validation(format!(
                "Unknown device state: {other} (expected one of AVAILABLE, IN_USE, INACTIVE)"
            ))),
        }
    }
}

impl std::fmt::Display for DeviceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
