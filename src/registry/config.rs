//! Registry configuration.

use crate::registry::domain::{ApiPrefix, RegistryDomainError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default time allowed for an adapter's connect operation.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// What to do when an adapter registers under a namespace already in use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateNamespacePolicy {
    /// Refuse the second registration; nothing changes.
    #[default]
    Reject,
    /// Swap in the new adapter and replace its summary in place.
    Replace,
}

/// Settings for an [`AdapterRegistry`](crate::registry::services::AdapterRegistry).
///
/// # Examples
///
/// ```
/// use amity::registry::config::{DuplicateNamespacePolicy, RegistryConfig};
///
/// let config = RegistryConfig::default();
/// assert_eq!(config.api_prefix().as_str(), "api");
/// assert_eq!(config.duplicate_namespaces(), DuplicateNamespacePolicy::Reject);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    api_prefix: ApiPrefix,
    connect_timeout: Duration,
    duplicate_namespaces: DuplicateNamespacePolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            api_prefix: ApiPrefix::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            duplicate_namespaces: DuplicateNamespacePolicy::Reject,
        }
    }
}

/// On-disk form of [`RegistryConfig`]; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RegistryConfigFile {
    api_prefix: Option<String>,
    connect_timeout_ms: Option<u64>,
    duplicate_namespaces: Option<DuplicateNamespacePolicy>,
}

/// Errors returned while loading a configuration file.
#[derive(Debug, Error)]
pub enum RegistryConfigError {
    /// The file is not valid TOML or has unknown keys.
    #[error("invalid registry configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value failed domain validation.
    #[error(transparent)]
    Domain(#[from] RegistryDomainError),
}

impl RegistryConfig {
    /// Parses a TOML document, falling back to defaults for missing keys.
    ///
    /// ```
    /// use amity::registry::config::RegistryConfig;
    /// use std::time::Duration;
    ///
    /// let config = RegistryConfig::from_toml_str(
    ///     "api_prefix = \"/api\"\nconnect_timeout_ms = 500\n",
    /// )
    /// .expect("valid config");
    /// assert_eq!(config.api_prefix().as_str(), "/api");
    /// assert_eq!(config.connect_timeout(), Duration::from_millis(500));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`RegistryConfigError`] when the document does not parse or
    /// the prefix is invalid.
    pub fn from_toml_str(source: &str) -> Result<Self, RegistryConfigError> {
        let file: RegistryConfigFile = toml::from_str(source)?;
        let mut config = Self::default();
        if let Some(prefix) = file.api_prefix {
            config.api_prefix = ApiPrefix::new(prefix)?;
        }
        if let Some(millis) = file.connect_timeout_ms {
            config.connect_timeout = Duration::from_millis(millis);
        }
        if let Some(policy) = file.duplicate_namespaces {
            config.duplicate_namespaces = policy;
        }
        Ok(config)
    }

    /// Sets the API prefix.
    #[must_use]
    pub fn with_api_prefix(mut self, prefix: ApiPrefix) -> Self {
        self.api_prefix = prefix;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the duplicate namespace policy.
    #[must_use]
    pub const fn with_duplicate_namespaces(mut self, policy: DuplicateNamespacePolicy) -> Self {
        self.duplicate_namespaces = policy;
        self
    }

    /// Returns the API prefix.
    #[must_use]
    pub const fn api_prefix(&self) -> &ApiPrefix {
        &self.api_prefix
    }

    /// Returns the connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Returns the duplicate namespace policy.
    #[must_use]
    pub const fn duplicate_namespaces(&self) -> DuplicateNamespacePolicy {
        self.duplicate_namespaces
    }
}
