mod device_id;
mod entity;
mod repository;
mod rules;
mod state;

pub use device_id::DeviceId;
pub use entity::{Device, DeviceChanges, NewDevice};
pub use repository::{DeviceRepository, DeviceTransaction};
pub use rules::DeviceRules;
pub use state::DeviceState;

#[cfg(any(test, feature = "mocks"))]
pub use repository::{MockDeviceRepository, MockDeviceTransaction};
