use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a Device
///
/// Rules:
/// - Assigned by the store at insert, never by callers
/// - Immutable for the lifetime of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(i64);

impl DeviceId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner key value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for DeviceId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_id_value() {
        let id = DeviceId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_device_id_serializes_as_number() {
        let json = serde_json::to_string(&DeviceId::new(5)).unwrap();
        assert_eq!(json, "5");

        let id: DeviceId = serde_json::from_str("12").unwrap();
        assert_eq!(id, DeviceId::from(12));
    }
}
