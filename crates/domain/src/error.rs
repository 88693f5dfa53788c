use crate::device::DeviceId;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid device data: {0}")]
    Validation(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(DeviceId),

    #[error("{0}")]
    DeviceInUse(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// True for failures caused by the request rather than the system
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

pub type Result<T> = std::result::Result<T, DomainError>;
