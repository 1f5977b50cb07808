//! Adapter registration and dynamic service mounting.
//!
//! Adapters wrap a backing store and declare named service groups. The
//! registry records each adapter, connects it in the background, and mounts
//! every declared service on the host at `{prefix}/{namespace}/{service}`.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Settings in [`config`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
