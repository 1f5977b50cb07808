//! Domain model for adapter registration and service mounting.
//!
//! The registry domain covers adapter identity, the endpoint naming scheme,
//! public server summaries, declared service manifests, and the per-adapter
//! lifecycle state machine. Runtime concerns remain outside this boundary.

pub mod endpoint;

mod error;
mod ids;
mod manifest;
mod state;
mod summary;

pub use error::{ParseAdapterStateError, RegistryDomainError};
pub use ids::{
    AdapterNamespace, ApiPrefix, DEFAULT_API_PREFIX, ServiceName, validate_adapter_type,
};
pub use manifest::{ServiceDescriptor, ServiceGroup, ServiceManifest};
pub use state::AdapterState;
pub use summary::ServerSummary;
