//! Public projection of a registered adapter.

use super::{AdapterNamespace, ApiPrefix, endpoint::adapter_endpoint};
use serde::{Deserialize, Serialize};

/// Non-sensitive description of a registered adapter.
///
/// This is the exact shape served to clients asking which servers are
/// configured: `{"name": .., "endpoint": .., "type": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSummary {
    name: String,
    endpoint: String,
    #[serde(rename = "type")]
    adapter_type: String,
}

impl ServerSummary {
    /// Creates the summary for an adapter under the given prefix.
    #[must_use]
    pub fn new(
        namespace: &AdapterNamespace,
        adapter_type: impl Into<String>,
        prefix: &ApiPrefix,
    ) -> Self {
        Self {
            name: namespace.as_str().to_owned(),
            endpoint: adapter_endpoint(prefix, namespace),
            adapter_type: adapter_type.into(),
        }
    }

    /// Returns the adapter namespace.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the adapter endpoint, `{prefix}/{namespace}`.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the adapter type tag.
    #[must_use]
    pub fn adapter_type(&self) -> &str {
        &self.adapter_type
    }
}
