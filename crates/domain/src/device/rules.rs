use super::Device;
use crate::error::{DomainError, Result};

const IN_USE_IDENTITY_LOCKED: &str = "Device is in use and cannot be fully updated";
const IN_USE_DELETE_FORBIDDEN: &str = "In-use devices cannot be deleted.";

/// Guards on mutations of an existing device.
///
/// Pure and stateless: every decision depends only on the stored device
/// and the requested values. The state field is never restricted.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceRules;

impl DeviceRules {
    pub fn new() -> Self {
        Self
    }

    /// Name and brand are locked while the device is IN_USE.
    ///
    /// `None` means the caller did not ask to change that field. Resubmitting
    /// the stored value is not a change.
    pub fn check_identity_change(
        &self,
        current: &Device,
        requested_name: Option<&str>,
        requested_brand: Option<&str>,
    ) -> Result<()> {
        if !current.is_in_use() {
            return Ok(());
        }

        let renames = requested_name.is_some_and(|name| name != current.name());
        let rebrands = requested_brand.is_some_and(|brand| brand != current.brand());

        if renames || rebrands {
            return Err(DomainError::DeviceInUse(IN_USE_IDENTITY_LOCKED.to_string()));
        }
        Ok(())
    }

    /// IN_USE devices cannot be deleted
    pub fn check_delete(&self, current: &Device) -> Result<()> {
        if current.is_in_use() {
            return Err(DomainError::DeviceInUse(
                IN_USE_DELETE_FORBIDDEN.to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceId, DeviceState};
    use chrono::Utc;

    fn device(state: DeviceState) -> Device {
        Device::restore(
            DeviceId::new(1),
            "Busy".to_string(),
            "Locked".to_string(),
            state,
            Utc::now(),
        )
    }

    #[test]
    fn test_identity_change_allowed_when_not_in_use() {
        let rules = DeviceRules::new();
        for state in [DeviceState::Available, DeviceState::Inactive] {
            let current = device(state);
            assert!(
                rules
                    .check_identity_change(&current, Some("Other"), Some("Brand"))
                    .is_ok()
            );
        }
    }

    #[test]
    fn test_rename_denied_while_in_use() {
        let rules = DeviceRules::new();
        let current = device(DeviceState::InUse);

        let result = rules.check_identity_change(&current, Some("New"), Some("Locked"));
        assert_eq!(
            result,
            Err(DomainError::DeviceInUse(IN_USE_IDENTITY_LOCKED.to_string()))
        );
    }

    #[test]
    fn test_rebrand_denied_while_in_use() {
        let rules = DeviceRules::new();
        let current = device(DeviceState::InUse);

        assert!(
            rules
                .check_identity_change(&current, Some("Busy"), Some("Changed"))
                .is_err()
        );
        assert!(
            rules
                .check_identity_change(&current, None, Some("Changed"))
                .is_err()
        );
    }

    #[test]
    fn test_same_identity_allowed_while_in_use() {
        let rules = DeviceRules::new();
        let current = device(DeviceState::InUse);

        assert!(
            rules
                .check_identity_change(&current, Some("Busy"), Some("Locked"))
                .is_ok()
        );
    }

    #[test]
    fn test_omitted_fields_never_trip_guard() {
        let rules = DeviceRules::new();
        let current = device(DeviceState::InUse);

        assert!(rules.check_identity_change(&current, None, None).is_ok());
        assert!(
            rules
                .check_identity_change(&current, Some("Busy"), None)
                .is_ok()
        );
    }

    #[test]
    fn test_identity_comparison_is_exact() {
        let rules = DeviceRules::new();
        let current = device(DeviceState::InUse);

        assert!(
            rules
                .check_identity_change(&current, Some("busy"), None)
                .is_err()
        );
        assert!(
            rules
                .check_identity_change(&current, Some("Busy "), None)
                .is_err()
        );
    }

    #[test]
    fn test_delete_guard() {
        let rules = DeviceRules::new();

        assert_eq!(
            rules.check_delete(&device(DeviceState::InUse)),
            Err(DomainError::DeviceInUse(
                IN_USE_DELETE_FORBIDDEN.to_string()
            ))
        );
        assert!(rules.check_delete(&device(DeviceState::Available)).is_ok());
        assert!(rules.check_delete(&device(DeviceState::Inactive)).is_ok());
    }
}
