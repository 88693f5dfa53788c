mod connection;
mod device_repository;

pub mod entities;

pub use connection::connect;
pub use device_repository::{SeaOrmDeviceRepository, SeaOrmDeviceTransaction};
