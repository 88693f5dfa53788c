//! Domain layer - Pure business logic with no external dependencies
//!
//! This crate contains:
//! - Entities (Device) and value objects (DeviceId, DeviceState)
//! - The in-use guards on device mutations (DeviceRules)
//! - Repository and clock interfaces (traits)
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Business rules enforced at domain level
//! - Testable in isolation

pub mod clock;
pub mod device;
pub mod error;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use device::{Device, DeviceChanges, DeviceId, DeviceRules, DeviceState, NewDevice};
pub use error::DomainError;

#[cfg(any(test, feature = "mocks"))]
pub use clock::MockClock;
