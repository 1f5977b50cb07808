//! Store adapter port: the contract every mountable adapter implements.

use crate::registry::domain::ServiceManifest;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for adapter connect operations.
pub type AdapterConnectResult<T> = Result<T, AdapterConnectError>;

/// A backing-store adapter that exposes named services once connected.
///
/// `S` is the host's handler type, for example an `axum::Router`.
#[async_trait]
pub trait StoreAdapter<S: Send + 'static>: Send + Sync {
    /// Unique namespace of the adapter, used as its path segment.
    fn namespace(&self) -> &str;

    /// Informational type tag, such as `MongoDB`.
    fn adapter_type(&self) -> &str;

    /// Scope of the adapter, such as `server` or `user`.
    fn scope(&self) -> &str;

    /// Establishes the backing connection and declares the services to
    /// mount.
    ///
    /// The registry calls this exactly once per registration.
    async fn connect(&self) -> AdapterConnectResult<ServiceManifest<S>>;
}

/// Errors returned by adapter connect operations.
#[derive(Debug, Clone, Error)]
pub enum AdapterConnectError {
    /// The backing store could not be reached.
    #[error("backing store unreachable: {0}")]
    Unreachable(String),

    /// The backing store rejected the adapter's credentials or settings.
    #[error("backing store rejected the connection: {0}")]
    Rejected(String),

    /// Generic adapter failure.
    #[error("adapter runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl AdapterConnectError {
    /// Wraps a runtime error raised by an adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
