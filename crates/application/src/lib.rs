//! Application layer - Use cases and business workflows

pub mod device;

pub use device::DeviceService;
