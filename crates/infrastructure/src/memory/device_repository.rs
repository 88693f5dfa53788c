use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::DomainError;
use domain::device::{
    Device, DeviceId, DeviceRepository, DeviceState, DeviceTransaction, NewDevice,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
struct Inner {
    devices: BTreeMap<DeviceId, Device>,
    last_id: i64,
}

/// Process-local device store.
///
/// Ids come from a counter that never goes backwards, so ids of deleted
/// devices are not reused. A transaction holds the store lock until it is
/// committed or dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDeviceRepository {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryDeviceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn collect<F>(&self, predicate: F) -> Vec<Device>
    where
        F: Fn(&Device) -> bool,
    {
        let inner = self.inner.lock().await;
        inner
            .devices
            .values()
            .filter(|d| predicate(d))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DeviceRepository for InMemoryDeviceRepository {
    async fn insert(
        &self,
        device: &NewDevice,
        creation_time: DateTime<Utc>,
    ) -> Result<Device, DomainError> {
        let mut inner = self.inner.lock().await;
        let next = inner
            .last_id
            .checked_add(1)
            .ok_or_else(|| DomainError::Storage("Device id space exhausted".to_string()))?;
        inner.last_id = next;

        let id = DeviceId::new(next);
        let stored = Device::restore(
            id,
            device.name().to_string(),
            device.brand().to_string(),
            device.state(),
            creation_time,
        );
        inner.devices.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: DeviceId) -> Result<Option<Device>, DomainError> {
        let inner = self.inner.lock().await;
        Ok(inner.devices.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Device>, DomainError> {
        Ok(self.collect(|_| true).await)
    }

    async fn find_by_brand(&self, brand: &str) -> Result<Vec<Device>, DomainError> {
        Ok(self.collect(|d| d.brand() == brand).await)
    }

    async fn find_by_state(&self, state: DeviceState) -> Result<Vec<Device>, DomainError> {
        Ok(self.collect(|d| d.state() == state).await)
    }

    async fn begin(&self) -> Result<Box<dyn DeviceTransaction>, DomainError> {
        let guard = self.inner.clone().lock_owned().await;
        Ok(Box::new(InMemoryDeviceTransaction {
            guard: Some(guard),
            staged: BTreeMap::new(),
        }))
    }
}

/// Writes are staged (`None` = deleted) and applied on commit
pub struct InMemoryDeviceTransaction {
    guard: Option<OwnedMutexGuard<Inner>>,
    staged: BTreeMap<DeviceId, Option<Device>>,
}

impl InMemoryDeviceTransaction {
    fn inner(&self) -> Result<&Inner, DomainError> {
        self.guard
            .as_deref()
            .ok_or_else(|| DomainError::Storage("Transaction already committed".to_string()))
    }

    fn current(&self, id: DeviceId) -> Result<Option<Device>, DomainError> {
        match self.staged.get(&id) {
            Some(staged) => Ok(staged.clone()),
            None => Ok(self.inner()?.devices.get(&id).cloned()),
        }
    }
}

#[async_trait]
impl DeviceTransaction for InMemoryDeviceTransaction {
    async fn find_for_update(&mut self, id: DeviceId) -> Result<Option<Device>, DomainError> {
        self.current(id)
    }

    async fn update(&mut self, device: &Device) -> Result<(), DomainError> {
        let existing = self.current(device.id())?.ok_or_else(|| {
            DomainError::Storage(format!("Device {} does not exist", device.id()))
        })?;

        // id and creation time always come from the stored record
        let updated = Device::restore(
            existing.id(),
            device.name().to_string(),
            device.brand().to_string(),
            device.state(),
            existing.creation_time(),
        );
        self.staged.insert(device.id(), Some(updated));
        Ok(())
    }

    async fn delete(&mut self, id: DeviceId) -> Result<(), DomainError> {
        self.inner()?;
        self.staged.insert(id, None);
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DomainError> {
        let mut guard = self
            .guard
            .take()
            .ok_or_else(|| DomainError::Storage("Transaction already committed".to_string()))?;

        for (id, change) in std::mem::take(&mut self.staged) {
            match change {
                Some(device) => {
                    guard.devices.insert(id, device);
                }
                None => {
                    guard.devices.remove(&id);
                }
            }
        }
        Ok(())
    }
}
