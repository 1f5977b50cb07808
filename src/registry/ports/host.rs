//! Host application port: the routing surface services are mounted on.

use crate::registry::domain::ServerSummary;
use std::sync::Arc;
use thiserror::Error;

/// Result type for host mount operations.
pub type MountHostResult<T> = Result<T, MountHostError>;

/// Read access to the ordered list of registered servers.
pub trait ServerListing: Send + Sync {
    /// Returns server summaries in registration order.
    fn list_servers(&self) -> Vec<ServerSummary>;
}

/// Routing surface of the host application.
///
/// Hosts decide how duplicate paths are treated: they may replace the
/// earlier handler or return [`MountHostError::DuplicatePath`]. The registry
/// does not deduplicate paths itself.
pub trait MountHost<S>: Send + Sync {
    /// Binds `service` to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`MountHostError`] when the host cannot bind the path.
    fn mount(&self, path: &str, service: S) -> MountHostResult<()>;

    /// Serves the registry's server listing at `path`.
    ///
    /// Hosts that cannot serve listings keep the default, which does
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`MountHostError`] when the host cannot bind the path.
    fn mount_listing(
        &self,
        _path: &str,
        _listing: Arc<dyn ServerListing>,
    ) -> MountHostResult<()> {
        Ok(())
    }
}

/// Errors returned by host adapters.
#[derive(Debug, Clone, Error)]
pub enum MountHostError {
    /// A handler is already bound to the path.
    #[error("a service is already mounted at '{0}'")]
    DuplicatePath(String),

    /// The host cannot bind the path.
    #[error("invalid mount path '{path}': {reason}")]
    InvalidPath {
        /// Requested path.
        path: String,
        /// Reason string.
        reason: String,
    },

    /// Generic host failure.
    #[error("host runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl MountHostError {
    /// Wraps a runtime error from the host adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
