//! Configuration-store wiring for server and user settings.

use crate::registry::{
    domain::{ServerSummary, endpoint::config_store_endpoint},
    ports::{MountHost, MountHostError, StoreAdapter},
    services::registry::{AdapterRegistry, RegistrationError},
};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument};

/// Scope a unified configuration store must declare.
const SERVER_SCOPE: &str = "server";

/// Collection served by a configuration store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigStoreKind {
    /// Stores details about configured servers.
    Servers,
    /// Stores per-user authentication details.
    Users,
}

impl ConfigStoreKind {
    /// Returns the collection path segment.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Servers => "servers",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for ConfigStoreKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.collection())
    }
}

/// Errors returned while wiring configuration stores.
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    /// A store was requested but none was supplied.
    #[error("No storage service was configured for Amity {store}.")]
    MissingStoreConfiguration {
        /// Which store was missing.
        store: ConfigStoreKind,
    },
    /// The store handle resolved to an adapter without the `server` scope.
    #[error(
        "When setting up a serverStore, please provide a SERVER adapter. You have passed a {scope} adapter."
    )]
    WrongScope {
        /// Scope the adapter declared.
        scope: String,
    },
    /// The store handle itself failed to resolve.
    #[error("configuration store unavailable: {0}")]
    StoreUnavailable(Arc<dyn std::error::Error + Send + Sync>),
    /// Registering the store adapter failed.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    /// The host rejected the store service.
    #[error(transparent)]
    Host(#[from] MountHostError),
}

impl<S, H> AdapterRegistry<S, H>
where
    S: Send + 'static,
    H: MountHost<S> + 'static,
{
    /// Registers a store as the unified server and user configuration store.
    ///
    /// `store` resolves to the adapter once it is available. Only adapters
    /// whose scope is `server` (case-insensitive) are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigStoreError::WrongScope`] for other scopes,
    /// [`ConfigStoreError::StoreUnavailable`] when the handle fails, and
    /// [`ConfigStoreError::Registration`] when registration fails.
    #[instrument(skip_all)]
    pub async fn use_config_store<F, E>(&self, store: F) -> Result<ServerSummary, ConfigStoreError>
    where
        F: Future<Output = Result<Arc<dyn StoreAdapter<S>>, E>> + Send,
        E: std::error::Error + Send + Sync + 'static,
    {
        let adapter = store
            .await
            .map_err(|err| ConfigStoreError::StoreUnavailable(Arc::new(err)))?;

        let scope = adapter.scope().trim();
        if !scope.eq_ignore_ascii_case(SERVER_SCOPE) {
            let err = ConfigStoreError::WrongScope {
                scope: scope.to_owned(),
            };
            error!(namespace = adapter.namespace(), "{err}");
            return Err(err);
        }

        Ok(self.register(adapter)?)
    }

    /// Mounts the service that stores configured servers at
    /// `{prefix}/amity/servers`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigStoreError::MissingStoreConfiguration`] for `None` and
    /// [`ConfigStoreError::Host`] when the host rejects the mount.
    pub fn set_server_config_store(&self, store: Option<S>) -> Result<String, ConfigStoreError> {
        self.mount_config_store(ConfigStoreKind::Servers, store)
    }

    /// Mounts the service that stores user details at
    /// `{prefix}/amity/users`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigStoreError::MissingStoreConfiguration`] for `None` and
    /// [`ConfigStoreError::Host`] when the host rejects the mount.
    pub fn set_user_config_store(&self, store: Option<S>) -> Result<String, ConfigStoreError> {
        self.mount_config_store(ConfigStoreKind::Users, store)
    }

    fn mount_config_store(
        &self,
        kind: ConfigStoreKind,
        store: Option<S>,
    ) -> Result<String, ConfigStoreError> {
        let service =
            store.ok_or(ConfigStoreError::MissingStoreConfiguration { store: kind })?;
        let endpoint = config_store_endpoint(self.api_prefix(), kind.collection());
        self.host().mount(&endpoint, service)?;
        info!(%endpoint, store = %kind, "mounted configuration store");
        Ok(endpoint)
    }
}
