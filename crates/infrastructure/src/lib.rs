//! Infrastructure layer - Storage backends and configuration

pub mod config;
pub mod database;
pub mod memory;

pub use config::AppConfig;
pub use database::SeaOrmDeviceRepository;
pub use memory::InMemoryDeviceRepository;
