use crate::database::entities::devices;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use domain::DomainError;
use domain::device::{
    Device, DeviceId, DeviceRepository, DeviceState, DeviceTransaction, NewDevice,
};
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

/// sea-orm backed device store (PostgreSQL or SQLite)
#[derive(Clone)]
pub struct SeaOrmDeviceRepository {
    db: DatabaseConnection,
}

impl SeaOrmDeviceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_offset(dt: DateTime<Utc>) -> DateTime<FixedOffset> {
        dt.fixed_offset()
    }

    async fn find_where(
        &self,
        filter: Option<sea_orm::sea_query::SimpleExpr>,
    ) -> Result<Vec<Device>, DomainError> {
        let mut query = devices::Entity::find();
        if let Some(condition) = filter {
            query = query.filter(condition);
        }

        let models = query
            .order_by_asc(devices::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        models.into_iter().map(model_to_device).collect()
    }
}

fn db_error(e: DbErr) -> DomainError {
    DomainError::Storage(format!("Database error: {}", e))
}

fn model_to_device(model: devices::Model) -> Result<Device, DomainError> {
    let state = model.state.parse::<DeviceState>().map_err(|_| {
        DomainError::Storage(format!(
            "Unknown device state '{}' stored for device {}",
            model.state, model.id
        ))
    })?;

    Ok(Device::restore(
        DeviceId::new(model.id),
        model.name,
        model.brand,
        state,
        model.creation_time.with_timezone(&Utc),
    ))
}

#[async_trait]
impl DeviceRepository for SeaOrmDeviceRepository {
    async fn insert(
        &self,
        device: &NewDevice,
        creation_time: DateTime<Utc>,
    ) -> Result<Device, DomainError> {
        let active_model = devices::ActiveModel {
            id: NotSet,
            name: Set(device.name().to_string()),
            brand: Set(device.brand().to_string()),
            state: Set(device.state().as_str().to_string()),
            creation_time: Set(Self::to_offset(creation_time)),
        };

        let model = active_model.insert(&self.db).await.map_err(db_error)?;
        model_to_device(model)
    }

    async fn find_by_id(&self, id: DeviceId) -> Result<Option<Device>, DomainError> {
        let model = devices::Entity::find_by_id(id.value())
            .one(&self.db)
            .await
            .map_err(db_error)?;

        model.map(model_to_device).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Device>, DomainError> {
        self.find_where(None).await
    }

    async fn find_by_brand(&self, brand: &str) -> Result<Vec<Device>, DomainError> {
        self.find_where(Some(devices::Column::Brand.eq(brand)))
            .await
    }

    async fn find_by_state(&self, state: DeviceState) -> Result<Vec<Device>, DomainError> {
        self.find_where(Some(devices::Column::State.eq(state.as_str())))
            .await
    }

    async fn begin(&self) -> Result<Box<dyn DeviceTransaction>, DomainError> {
        let txn = self.db.begin().await.map_err(db_error)?;
        Ok(Box::new(SeaOrmDeviceTransaction { txn: Some(txn) }))
    }
}

/// Database transaction; rolled back by sea-orm when dropped uncommitted
pub struct SeaOrmDeviceTransaction {
    txn: Option<DatabaseTransaction>,
}

impl SeaOrmDeviceTransaction {
    fn active(&self) -> Result<&DatabaseTransaction, DomainError> {
        self.txn
            .as_ref()
            .ok_or_else(|| DomainError::Storage("Transaction already committed".to_string()))
    }
}

#[async_trait]
impl DeviceTransaction for SeaOrmDeviceTransaction {
    async fn find_for_update(&mut self, id: DeviceId) -> Result<Option<Device>, DomainError> {
        // SELECT ... FOR UPDATE on Postgres; SQLite ignores the lock clause
        let model = devices::Entity::find_by_id(id.value())
            .lock_exclusive()
            .one(self.active()?)
            .await
            .map_err(db_error)?;

        model.map(model_to_device).transpose()
    }

    async fn update(&mut self, device: &Device) -> Result<(), DomainError> {
        let active_model = devices::ActiveModel {
            id: Unchanged(device.id().value()),
            name: Set(device.name().to_string()),
            brand: Set(device.brand().to_string()),
            state: Set(device.state().as_str().to_string()),
            creation_time: NotSet,
        };

        active_model
            .update(self.active()?)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn delete(&mut self, id: DeviceId) -> Result<(), DomainError> {
        devices::Entity::delete_by_id(id.value())
            .exec(self.active()?)
            .await
            .map_err(db_error)?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DomainError> {
        let txn = self
            .txn
            .take()
            .ok_or_else(|| DomainError::Storage("Transaction already committed".to_string()))?;
        txn.commit().await.map_err(db_error)
    }
}
