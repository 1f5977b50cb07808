//! Axum host adapter: mounts services as nested routers.

use crate::registry::ports::{MountHost, MountHostError, MountHostResult, ServerListing};
use axum::{Json, Router, routing::get};
use std::collections::BTreeSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

/// Host that composes mounted services into a single [`Router`].
///
/// Registry paths such as `api/primary/users` are served at
/// `/api/primary/users`. Duplicate paths, and paths nested inside or around
/// an existing mount, are rejected instead of panicking.
///
/// Segments containing `:`, `*`, `{` or `}` are route syntax to axum, so
/// namespaces keyed as `host:port` cannot be mounted here and fail with
/// [`MountHostError::InvalidPath`]. Register such stores under a plain
/// namespace when serving them over HTTP.
#[derive(Debug, Clone, Default)]
pub struct AxumMountHost {
    state: Arc<RwLock<AxumHostState>>,
}

#[derive(Debug)]
struct AxumHostState {
    router: Router,
    mounted: BTreeSet<String>,
}

impl Default for AxumHostState {
    fn default() -> Self {
        Self {
            router: Router::new(),
            mounted: BTreeSet::new(),
        }
    }
}

fn lock_error(err: impl std::fmt::Display) -> MountHostError {
    MountHostError::runtime(std::io::Error::other(err.to_string()))
}

fn invalid_path(path: &str, reason: &str) -> MountHostError {
    MountHostError::InvalidPath {
        path: path.to_owned(),
        reason: reason.to_owned(),
    }
}

/// Converts a registry path into an absolute route path.
fn route_path(path: &str) -> MountHostResult<String> {
    let trimmed = path.trim();
    let absolute = if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    };

    if absolute == "/" {
        return Err(invalid_path(path, "cannot mount at the root"));
    }
    if absolute.ends_with('/') || absolute.contains("//") {
        return Err(invalid_path(path, "empty path segment"));
    }
    if absolute.contains([':', '*', '{', '}']) {
        return Err(invalid_path(path, "route parameter syntax is not allowed"));
    }

    Ok(absolute)
}

/// Returns whether one route is nested inside the other.
fn overlaps(mounted: &str, route: &str) -> bool {
    let nested_in = |outer: &str, inner: &str| {
        inner
            .strip_prefix(outer)
            .is_some_and(|rest| rest.starts_with('/'))
    };
    nested_in(mounted, route) || nested_in(route, mounted)
}

impl AxumMountHost {
    /// Creates a host with an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the router composed from every mount so far.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn router(&self) -> MountHostResult<Router> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.router.clone())
    }

    /// Returns mounted route paths in sorted order.
    ///
    /// # Errors
    ///
    /// Returns host runtime errors when lock acquisition fails.
    pub fn mounted_paths(&self) -> MountHostResult<Vec<String>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.mounted.iter().cloned().collect())
    }

    fn nest(&self, path: &str, service: Router) -> MountHostResult<()> {
        let route = route_path(path)?;
        let mut state = self.state.write().map_err(lock_error)?;

        if state.mounted.contains(&route) {
            return Err(MountHostError::DuplicatePath(route));
        }

        if state.mounted.iter().any(|mounted| overlaps(mounted, &route)) {
            return Err(invalid_path(path, "overlaps an existing mount"));
        }

        // Axum panics on conflicting routes; the current router stays intact.
        let current = state.router.clone();
        let nested = panic::catch_unwind(AssertUnwindSafe(|| current.nest(&route, service)))
            .map_err(|_| invalid_path(path, "conflicts with an existing route"))?;

        state.router = nested;
        state.mounted.insert(route);
        Ok(())
    }
}

impl MountHost<Router> for AxumMountHost {
    fn mount(&self, path: &str, service: Router) -> MountHostResult<()> {
        self.nest(path, service)
    }

    fn mount_listing(&self, path: &str, listing: Arc<dyn ServerListing>) -> MountHostResult<()> {
        let handler = move || {
            let listing = Arc::clone(&listing);
            async move { Json(listing.list_servers()) }
        };
        self.nest(path, Router::new().route("/", get(handler)))
    }
}
