use std::sync::Arc;
use tracing::{debug, info, warn};

use domain::device::{DeviceRepository, DeviceTransaction};
use domain::error::Result;
use domain::{Clock, Device, DeviceChanges, DeviceId, DeviceRules, DeviceState, DomainError, NewDevice};

/// Device use cases: the store and the in-use guards composed into
/// create / update / partial update / lookups / delete.
pub struct DeviceService {
    repository: Arc<dyn DeviceRepository>,
    rules: DeviceRules,
    clock: Arc<dyn Clock>,
}

impl DeviceService {
    pub fn new(
        repository: Arc<dyn DeviceRepository>,
        rules: DeviceRules,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            rules,
            clock,
        }
    }

    /// Store a new device. Creation time comes from the service clock.
    pub async fn create(&self, draft: NewDevice) -> Result<Device> {
        let creation_time = self.clock.now();
        let device = self.repository.insert(&draft, creation_time).await?;

        info!(device_id = %device.id(), state = %device.state(), "Device created");
        Ok(device)
    }

    /// Replace name, brand and state of an existing device
    pub async fn update(&self, id: DeviceId, replacement: NewDevice) -> Result<Device> {
        self.modify(id, replacement.into()).await
    }

    /// Change only the supplied fields of an existing device
    pub async fn partial_update(&self, id: DeviceId, changes: DeviceChanges) -> Result<Device> {
        self.modify(id, changes).await
    }

    pub async fn find_by_id(&self, id: DeviceId) -> Result<Device> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::DeviceNotFound(id))
    }

    pub async fn find_all(&self) -> Result<Vec<Device>> {
        self.repository.find_all().await
    }

    pub async fn find_by_brand(&self, brand: &str) -> Result<Vec<Device>> {
        self.repository.find_by_brand(brand).await
    }

    pub async fn find_by_state(&self, state: DeviceState) -> Result<Vec<Device>> {
        self.repository.find_by_state(state).await
    }

    /// Remove a device unless it is IN_USE
    pub async fn delete(&self, id: DeviceId) -> Result<()> {
        let mut tx = self.repository.begin().await?;
        let device = Self::locked(&mut tx, id).await?;

        if let Err(e) = self.rules.check_delete(&device) {
            warn!(device_id = %id, "Refusing to delete in-use device");
            return Err(e);
        }

        tx.delete(id).await?;
        tx.commit().await?;

        info!(device_id = %id, "Device deleted");
        Ok(())
    }

    /// Read, check and write inside one transaction
    async fn modify(&self, id: DeviceId, changes: DeviceChanges) -> Result<Device> {
        let mut tx = self.repository.begin().await?;
        let mut device = Self::locked(&mut tx, id).await?;

        if let Err(e) =
            self.rules
                .check_identity_change(&device, changes.name(), changes.brand())
        {
            warn!(
                device_id = %id,
                requested_name = ?changes.name(),
                requested_brand = ?changes.brand(),
                "Refusing identity change of in-use device"
            );
            return Err(e);
        }

        device.apply(&changes);
        tx.update(&device).await?;
        tx.commit().await?;

        info!(device_id = %id, state = %device.state(), "Device updated");
        Ok(device)
    }

    async fn locked(tx: &mut Box<dyn DeviceTransaction>, id: DeviceId) -> Result<Device> {
        match tx.find_for_update(id).await? {
            Some(device) => Ok(device),
            None => {
                debug!(device_id = %id, "Device not found");
                Err(DomainError::DeviceNotFound(id))
            }
        }
    }
}
