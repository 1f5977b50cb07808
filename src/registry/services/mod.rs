//! Application services for adapter registration and service mounting.

pub mod config_store;
pub mod mounter;
pub mod startup;

mod registry;
mod status;

pub use config_store::{ConfigStoreError, ConfigStoreKind};
pub use mounter::{MountError, ServiceMounter};
pub use registry::{AdapterRegistry, RegistrationError, RegistrationResult};
pub use startup::{StartupError, start};
pub use status::{AdapterFailure, AdapterStatus, ConnectFailure};
