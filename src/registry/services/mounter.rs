//! Binds a connected adapter's declared services to host paths.

use crate::registry::{
    domain::{AdapterNamespace, ApiPrefix, ServiceManifest, endpoint::service_endpoint},
    ports::{MountHost, MountHostError},
};
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// A mount rejected by the host, with the endpoints mounted before it.
#[derive(Debug, Clone, Error)]
#[error("failed to mount '{endpoint}': {source}")]
pub struct MountError {
    /// Endpoints mounted before the failure, in mount order.
    pub mounted: Vec<String>,
    /// Endpoint the host rejected.
    pub endpoint: String,
    /// Host error.
    pub source: MountHostError,
}

/// Mounts every service of a manifest at `{prefix}/{namespace}/{service}`.
pub struct ServiceMounter<S, H> {
    host: Arc<H>,
    api_prefix: ApiPrefix,
    _service: PhantomData<fn(S)>,
}

impl<S, H> Clone for ServiceMounter<S, H> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            api_prefix: self.api_prefix.clone(),
            _service: PhantomData,
        }
    }
}

impl<S, H> ServiceMounter<S, H>
where
    H: MountHost<S>,
{
    /// Creates a mounter bound to a host and prefix.
    #[must_use]
    pub const fn new(host: Arc<H>, api_prefix: ApiPrefix) -> Self {
        Self {
            host,
            api_prefix,
            _service: PhantomData,
        }
    }

    /// Returns the host services are mounted on.
    #[must_use]
    pub const fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// Returns the API prefix.
    #[must_use]
    pub const fn api_prefix(&self) -> &ApiPrefix {
        &self.api_prefix
    }

    /// Mounts groups in declaration order and, within each group, services
    /// in declaration order. Stops at the first host rejection.
    ///
    /// Returns the mounted endpoints; an empty manifest mounts nothing.
    ///
    /// # Errors
    ///
    /// Returns [`MountError`] when the host rejects a mount.
    pub fn mount_manifest(
        &self,
        namespace: &AdapterNamespace,
        manifest: ServiceManifest<S>,
    ) -> Result<Vec<String>, MountError> {
        let mut mounted = Vec::with_capacity(manifest.service_count());

        for group in manifest.into_groups() {
            let group_name = group.name().to_owned();
            for descriptor in group.into_services() {
                let (name, service) = descriptor.into_parts();
                let endpoint = service_endpoint(&self.api_prefix, namespace, &name);

                if let Err(source) = self.host.mount(&endpoint, service) {
                    return Err(MountError {
                        mounted,
                        endpoint,
                        source,
                    });
                }

                debug!(%namespace, group = %group_name, %endpoint, "mounted service");
                mounted.push(endpoint);
            }
        }

        Ok(mounted)
    }
}
