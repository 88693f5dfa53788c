use super::{Device, DeviceId, DeviceState, NewDevice};
use crate::DomainError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for Device persistence
///
/// Implementations live in the infrastructure layer. List results carry no
/// ordering guarantee.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Persist a new device; the store assigns the id
    async fn insert(
        &self,
        device: &NewDevice,
        creation_time: DateTime<Utc>,
    ) -> Result<Device, DomainError>;

    /// Find device by ID
    async fn find_by_id(&self, id: DeviceId) -> Result<Option<Device>, DomainError>;

    /// Find all devices
    async fn find_all(&self) -> Result<Vec<Device>, DomainError>;

    /// Find devices whose brand matches exactly (case-sensitive)
    async fn find_by_brand(&self, brand: &str) -> Result<Vec<Device>, DomainError>;

    /// Find devices in the given state
    async fn find_by_state(&self, state: DeviceState) -> Result<Vec<Device>, DomainError>;

    /// Open a transaction for a read-check-write sequence
    async fn begin(&self) -> Result<Box<dyn DeviceTransaction>, DomainError>;
}

/// Atomic unit of work over a single device.
///
/// Nothing written through the transaction is visible to other writers
/// before `commit`. Dropping it without committing discards its writes.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait DeviceTransaction: Send {
    /// Read a device and keep it locked against concurrent writers
    async fn find_for_update(&mut self, id: DeviceId) -> Result<Option<Device>, DomainError>;

    /// Write back name, brand and state of an existing device
    async fn update(&mut self, device: &Device) -> Result<(), DomainError>;

    /// Remove a device permanently
    async fn delete(&mut self, id: DeviceId) -> Result<(), DomainError>;

    /// Make the writes durable. The transaction is spent afterwards.
    async fn commit(&mut self) -> Result<(), DomainError>;
}
