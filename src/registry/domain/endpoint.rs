//! Path scheme for adapter and service endpoints.
//!
//! Paths are joined with a single `/` and no normalisation, so they stay
//! bit-compatible with existing clients: `{prefix}/{namespace}` for an
//! adapter and `{prefix}/{namespace}/{service}` for each of its services.

use super::{AdapterNamespace, ApiPrefix, ServiceName};

/// Path at which the server listing is mounted during startup.
pub const SERVER_LISTING_PATH: &str = "amity/servers";

/// Path segment under the prefix that holds the config-store services.
const CONFIG_STORE_SEGMENT: &str = "amity";

/// Returns the public endpoint of an adapter.
#[must_use]
pub fn adapter_endpoint(prefix: &ApiPrefix, namespace: &AdapterNamespace) -> String {
    format!("{prefix}/{namespace}")
}

/// Returns the endpoint at which one of an adapter's services is mounted.
#[must_use]
pub fn service_endpoint(
    prefix: &ApiPrefix,
    namespace: &AdapterNamespace,
    service: &ServiceName,
) -> String {
    format!("{prefix}/{namespace}/{service}")
}

/// Returns the endpoint for a config-store collection such as `servers`.
#[must_use]
pub fn config_store_endpoint(prefix: &ApiPrefix, collection: &str) -> String {
    format!("{prefix}/{CONFIG_STORE_SEGMENT}/{collection}")
}
