//! Port contracts for store adapters and the host application.

mod adapter;
mod host;

pub use adapter::{AdapterConnectError, AdapterConnectResult, StoreAdapter};
pub use host::{MountHost, MountHostError, MountHostResult, ServerListing};
