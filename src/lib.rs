//! Amity: a registry that connects store adapters and serves their data.
//!
//! Each adapter wraps one backing store (for example a database server).
//! Registering it publishes a summary straight away, then connects in the
//! background and mounts every service the store exposes under
//! `{prefix}/{namespace}/{service}` on the host application.
//!
//! # Architecture
//!
//! Amity follows hexagonal architecture principles:
//!
//! - **Domain**: Namespaces, endpoints, manifests, and adapter lifecycle
//! - **Ports**: The adapter contract and the host mount surface
//! - **Adapters**: An in-memory host and an `axum` router host
//!
//! # Modules
//!
//! - [`registry`]: Adapter registration, mounting, and startup wiring
//! - [`telemetry`]: Tracing subscriber setup

pub mod registry;
pub mod telemetry;
