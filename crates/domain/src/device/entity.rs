use chrono::{DateTime, Utc};

use super::{DeviceId, DeviceState};
use crate::error::{DomainError, Result};

const NAME_REQUIRED: &str = "The device name is mandatory and cannot be blank.";
const BRAND_REQUIRED: &str = "The device brand is mandatory and cannot be blank.";

fn non_blank(value: String, message: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(message.to_string()));
    }
    Ok(value)
}

/// A managed device as persisted by the store.
///
/// `id` and `creation_time` are fixed once the store hands the device out;
/// only name, brand and state change afterwards, through [`Device::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    id: DeviceId,
    name: String,
    brand: String,
    state: DeviceState,
    creation_time: DateTime<Utc>,
}

impl Device {
    /// Rebuild a device from stored values
    pub fn restore(
        id: DeviceId,
        name: String,
        brand: String,
        state: DeviceState,
        creation_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            brand,
            state,
            creation_time,
        }
    }

    // Getters
    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn creation_time(&self) -> DateTime<Utc> {
        self.creation_time
    }

    pub fn is_in_use(&self) -> bool {
        self.state.is_in_use()
    }

    /// Overwrite the supplied fields, keeping the rest
    pub fn apply(&mut self, changes: &DeviceChanges) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(brand) = &changes.brand {
            self.brand = brand.clone();
        }
        if let Some(state) = changes.state {
            self.state = state;
        }
    }
}

/// Caller-supplied values for a device that does not exist yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDevice {
    name: String,
    brand: String,
    state: DeviceState,
}

impl NewDevice {
    /// Create a draft, rejecting blank name or brand
    pub fn new(name: impl Into<String>, brand: impl Into<String>, state: DeviceState) -> Result<Self> {
        Ok(Self {
            name: non_blank(name.into(), NAME_REQUIRED)?,
            brand: non_blank(brand.into(), BRAND_REQUIRED)?,
            state,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }
}

/// Requested modifications to an existing device.
///
/// `None` means "keep the current value"; a full replacement has every
/// field set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceChanges {
    name: Option<String>,
    brand: Option<String>,
    state: Option<DeviceState>,
}

impl DeviceChanges {
    /// Build a partial change set, rejecting blank values that are present
    pub fn new(
        name: Option<String>,
        brand: Option<String>,
        state: Option<DeviceState>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.map(|n| non_blank(n, NAME_REQUIRED)).transpose()?,
            brand: brand.map(|b| non_blank(b, BRAND_REQUIRED)).transpose()?,
            state,
        })
    }

    /// Change set replacing every mutable field
    pub fn replace_all(replacement: NewDevice) -> Self {
        Self {
            name: Some(replacement.name),
            brand: Some(replacement.brand),
            state: Some(replacement.state),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn brand(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn state(&self) -> Option<DeviceState> {
        self.state
    }
}

impl From<NewDevice> for DeviceChanges {
    fn from(replacement: NewDevice) -> Self {
        Self::replace_all(replacement)
    }
}
