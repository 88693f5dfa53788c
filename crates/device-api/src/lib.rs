pub mod api;
pub mod dto;
pub mod error;
pub mod state;

use anyhow::Result;
use application::DeviceService;
use domain::device::DeviceRepository;
use domain::{DeviceRules, SystemClock};
use infrastructure::config::StorageBackend;
use infrastructure::{AppConfig, InMemoryDeviceRepository, SeaOrmDeviceRepository, database};
use state::AppState;
use std::sync::Arc;
use tracing::info;

/// Wire the configured store into the device service.
pub async fn setup_app_state(config: &AppConfig) -> Result<Arc<AppState>> {
    let repository: Arc<dyn DeviceRepository> = match config.storage.backend {
        StorageBackend::Database => {
            let db = database::connect(&config.database).await?;
            Arc::new(SeaOrmDeviceRepository::new(db))
        }
        StorageBackend::Memory => {
            info!("Using in-memory device store, data is lost on restart");
            Arc::new(InMemoryDeviceRepository::new())
        }
    };

    Ok(Arc::new(with_repository(repository)))
}

/// State over an already built store, using the system clock
pub fn with_repository(repository: Arc<dyn DeviceRepository>) -> AppState {
    AppState::new(DeviceService::new(
        repository,
        DeviceRules::new(),
        Arc::new(SystemClock),
    ))
}
