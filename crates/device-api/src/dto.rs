//! Wire shapes of the device API and their conversions to domain types.

use chrono::{DateTime, Utc};
use domain::{Device, DeviceChanges, DeviceState, DomainError, NewDevice};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const STATE_REQUIRED: &str = "The device state is mandatory.";

/// Body of POST, PUT and PATCH.
///
/// Every field is optional on the wire so that a missing field is reported
/// with a validation message instead of a parse error. `id` and
/// `creationTime` sent by clients are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct DeviceRequest {
    #[schema(example = "Phone")]
    pub name: Option<String>,
    #[schema(example = "BrandX")]
    pub brand: Option<String>,
    pub state: Option<DeviceState>,
}

impl DeviceRequest {
    /// All fields are required (create and full replacement)
    pub fn into_new_device(self) -> Result<NewDevice, DomainError> {
        let name = self.name.unwrap_or_default();
        let brand = self.brand.unwrap_or_default();
        let state = self
            .state
            .ok_or_else(|| DomainError::Validation(STATE_REQUIRED.to_string()));

        match state {
            Ok(state) => NewDevice::new(name, brand, state),
            Err(missing_state) => {
                // Report blank name/brand ahead of the missing state
                NewDevice::new(name, brand, DeviceState::Available)?;
                Err(missing_state)
            }
        }
    }

    /// Omitted fields are left unchanged
    pub fn into_changes(self) -> Result<DeviceChanges, DomainError> {
        DeviceChanges::new(self.name, self.brand, self.state)
    }
}

/// A device as returned by every endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub state: DeviceState,
    pub creation_time: DateTime<Utc>,
}

impl From<&Device> for DeviceResponse {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id().value(),
            name: device.name().to_string(),
            brand: device.brand().to_string(),
            state: device.state(),
            creation_time: device.creation_time(),
        }
    }
}

impl From<Device> for DeviceResponse {
    fn from(device: Device) -> Self {
        Self::from(&device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::DeviceId;

    fn request(name: Option<&str>, brand: Option<&str>, state: Option<DeviceState>) -> DeviceRequest {
        DeviceRequest {
            name: name.map(str::to_string),
            brand: brand.map(str::to_string),
            state,
        }
    }

    #[test]
    fn test_full_request_converts() {
        let draft = request(Some("Tablet"), Some("BrandZ"), Some(DeviceState::Available))
            .into_new_device()
            .unwrap();

        assert_eq!(draft.name(), "Tablet");
        assert_eq!(draft.brand(), "BrandZ");
        assert_eq!(draft.state(), DeviceState::Available);
    }

    #[test]
    fn test_missing_fields_are_validation_errors() {
        let err = request(None, Some("B"), Some(DeviceState::Available))
            .into_new_device()
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::Validation("The device name is mandatory and cannot be blank.".into())
        );

        let err = request(Some("A"), Some("B"), None)
            .into_new_device()
            .unwrap_err();
        assert_eq!(err, DomainError::Validation(STATE_REQUIRED.into()));

        let err = request(Some("A"), None, None).into_new_device().unwrap_err();
        assert_eq!(
            err,
            DomainError::Validation("The device brand is mandatory and cannot be blank.".into())
        );
    }

    #[test]
    fn test_partial_request_keeps_absent_fields_absent() {
        let changes = request(None, None, Some(DeviceState::InUse))
            .into_changes()
            .unwrap();

        assert_eq!(changes.name(), None);
        assert_eq!(changes.brand(), None);
        assert_eq!(changes.state(), Some(DeviceState::InUse));

        assert!(request(Some(" "), None, None).into_changes().is_err());
    }

    #[test]
    fn test_request_ignores_server_owned_fields() {
        let body = r#"{"id": 99, "name": "A", "brand": "B", "state": "IN_USE", "creationTime": "2020-01-01T00:00:00Z"}"#;
        let parsed: DeviceRequest = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.name.as_deref(), Some("A"));
        assert_eq!(parsed.state, Some(DeviceState::InUse));
    }

    #[test]
    fn test_response_uses_camel_case() {
        let device = Device::restore(
            DeviceId::new(3),
            "Phone".into(),
            "BrandX".into(),
            DeviceState::Inactive,
            Utc::now(),
        );

        let json = serde_json::to_value(DeviceResponse::from(&device)).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["state"], "INACTIVE");
        assert!(json.get("creationTime").is_some());
        assert!(json.get("creation_time").is_none());
    }
}
