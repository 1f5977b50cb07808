//! In-memory host adapter for registry tests and local wiring.

use crate::registry::{
    domain::ServerSummary,
    ports::{MountHost, MountHostError, MountHostResult, ServerListing},
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory host that records every mount call in order.
///
/// By default a repeated path replaces the earlier handler. Use
/// [`InMemoryMountHost::rejecting_duplicates`] for a host that refuses them.
pub struct InMemoryMountHost<S> {
    state: Arc<RwLock<InMemoryHostState<S>>>,
}

struct InMemoryHostState<S> {
    reject_duplicates: bool,
    mounts: Vec<(String, S)>,
    failing_paths: HashMap<String, String>,
    listing: Option<(String, Arc<dyn ServerListing>)>,
}

impl<S> Default for InMemoryHostState<S> {
    fn default() -> Self {
        Self {
            reject_duplicates: false,
            mounts: Vec::new(),
            failing_paths: HashMap::new(),
            listing: None,
        }
    }
}

impl<S> Clone for InMemoryMountHost<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<S> Default for InMemoryMountHost<S> {
    fn default() -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryHostState::default())),
        }
    }
}

fn lock_error(err: impl std::fmt::Display) -> MountHostError {
    MountHostError::runtime(std::io::Error::other(err.to_string()))
}

impl<S> InMemoryMountHost<S> {
    /// Creates an empty host that accepts duplicate paths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty host that rejects duplicate paths.
    #[must_use]
    pub fn rejecting_duplicates() -> Self {
        let mut state = InMemoryHostState::default();
        state.reject_duplicates = true;
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Makes every later mount at `path` fail with a runtime error.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn fail_mounts_at(
        &self,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> MountHostResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.failing_paths.insert(path.into(), message.into());
        Ok(())
    }

    /// Returns mounted paths in call order.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn mounted_paths(&self) -> MountHostResult<Vec<String>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.mounts.iter().map(|(path, _)| path.clone()).collect())
    }

    /// Returns the number of accepted mount calls.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn mount_count(&self) -> MountHostResult<usize> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.mounts.len())
    }

    /// Returns the path the server listing was mounted at, if any.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn listing_path(&self) -> MountHostResult<Option<String>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.listing.as_ref().map(|(path, _)| path.clone()))
    }

    /// Reads the mounted server listing the way a client request would.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn served_listing(&self) -> MountHostResult<Option<Vec<ServerSummary>>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .listing
            .as_ref()
            .map(|(_, listing)| listing.list_servers()))
    }
}

impl<S: Clone> InMemoryMountHost<S> {
    /// Returns every accepted mount call in order.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn mounts(&self) -> MountHostResult<Vec<(String, S)>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.mounts.clone())
    }

    /// Returns the handler currently bound to `path`.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn service_at(&self, path: &str) -> MountHostResult<Option<S>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .mounts
            .iter()
            .rev()
            .find(|(mounted, _)| mounted == path)
            .map(|(_, service)| service.clone()))
    }
}

impl<S: Send + Sync> MountHost<S> for InMemoryMountHost<S> {
    fn mount(&self, path: &str, service: S) -> MountHostResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;

        if let Some(message) = state.failing_paths.get(path) {
            return Err(MountHostError::runtime(std::io::Error::other(
                message.clone(),
            )));
        }

        if state.reject_duplicates && state.mounts.iter().any(|(mounted, _)| mounted == path) {
            return Err(MountHostError::DuplicatePath(path.to_owned()));
        }

        state.mounts.push((path.to_owned(), service));
        Ok(())
    }

    fn mount_listing(&self, path: &str, listing: Arc<dyn ServerListing>) -> MountHostResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.listing.is_some() {
            return Err(MountHostError::DuplicatePath(path.to_owned()));
        }
        state.listing = Some((path.to_owned(), listing));
        Ok(())
    }
}
