//! Startup entry point wiring a registry onto a host application.

use crate::registry::{
    config::RegistryConfig,
    domain::endpoint::SERVER_LISTING_PATH,
    ports::{MountHost, MountHostError, StoreAdapter},
    services::registry::{AdapterRegistry, RegistrationError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    /// No host application was supplied.
    #[error("No host application was provided.")]
    MissingHostApplication,
    /// A configuration store could not be registered.
    #[error("failed to register configuration store: {0}")]
    Registration(#[from] RegistrationError),
    /// The host rejected the server listing.
    #[error("failed to mount server listing: {0}")]
    Host(#[from] MountHostError),
}

/// Creates a registry on `host` and registers the configuration stores.
///
/// A single `store` serves as both the server and the user store. When a
/// separate `user_store` is supplied it is registered after `store`. The
/// server listing is mounted at [`SERVER_LISTING_PATH`].
///
/// Nothing is left running when startup fails.
///
/// # Errors
///
/// Returns [`StartupError::MissingHostApplication`] without a host, and
/// the host or registration error that stopped startup otherwise.
#[instrument(skip_all, fields(api_prefix = %config.api_prefix()))]
pub fn start<S, H>(
    host: Option<Arc<H>>,
    config: RegistryConfig,
    store: Option<Arc<dyn StoreAdapter<S>>>,
    user_store: Option<Arc<dyn StoreAdapter<S>>>,
) -> Result<AdapterRegistry<S, H>, StartupError>
where
    S: Send + 'static,
    H: MountHost<S> + 'static,
{
    let host = host.ok_or(StartupError::MissingHostApplication)?;
    let registry = AdapterRegistry::new(config, Arc::clone(&host));

    host.mount_listing(SERVER_LISTING_PATH, registry.listing())?;

    for adapter in store.into_iter().chain(user_store) {
        if let Err(err) = registry.register(adapter) {
            drop(registry.abort_pending());
            return Err(err.into());
        }
    }

    info!(adapters = registry.len(), "amity registry started");
    Ok(registry)
}
