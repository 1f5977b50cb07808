//! Host adapter implementations for the mount port.

pub mod memory;

mod axum_host;

pub use axum_host::AxumMountHost;
pub use memory::InMemoryMountHost;
