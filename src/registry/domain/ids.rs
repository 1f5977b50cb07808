//! Validated names used to build registry paths.
//!
//! Namespaces and service names become URL path segments, so neither may
//! contain a `/` or whitespace. Values are otherwise kept verbatim: a
//! namespace such as `db1.example.com:27017` is a single opaque key.

use super::RegistryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for an adapter namespace.
const MAX_NAMESPACE_LENGTH: usize = 255;

/// Default prefix shared by every endpoint a registry manages.
pub const DEFAULT_API_PREFIX: &str = "api";

fn is_segment_safe(value: &str) -> bool {
    !value
        .chars()
        .any(|character| character == '/' || character.is_whitespace())
}

/// Unique key of a registered adapter, also its path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdapterNamespace(String);

impl AdapterNamespace {
    /// Creates a validated adapter namespace.
    ///
    /// The value is kept verbatim, case included, so the registry key always
    /// equals the adapter's own namespace.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError`] when the namespace is blank, longer
    /// than 255 characters, or not usable as a single path segment
    /// (surrounding whitespace included).
    pub fn new(value: impl Into<String>) -> Result<Self, RegistryDomainError> {
        let namespace = value.into();

        if namespace.trim().is_empty() {
            return Err(RegistryDomainError::EmptyNamespace);
        }

        if !is_segment_safe(&namespace) {
            return Err(RegistryDomainError::InvalidNamespace(namespace));
        }

        if namespace.chars().count() > MAX_NAMESPACE_LENGTH {
            return Err(RegistryDomainError::NamespaceTooLong(namespace));
        }

        Ok(Self(namespace))
    }

    /// Returns the namespace as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AdapterNamespace {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AdapterNamespace {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Name of a single mountable service within an adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Creates a validated service name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError`] when the name is empty or not usable
    /// as a single path segment.
    pub fn new(value: impl Into<String>) -> Result<Self, RegistryDomainError> {
        let trimmed = value.into().trim().to_owned();

        if trimmed.is_empty() {
            return Err(RegistryDomainError::EmptyServiceName);
        }

        if !is_segment_safe(&trimmed) {
            return Err(RegistryDomainError::InvalidServiceName(trimmed));
        }

        Ok(Self(trimmed))
    }

    /// Returns the service name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Leading path shared by all endpoints a registry manages.
///
/// The prefix is used literally: `api` yields `api/<namespace>` and `/api`
/// yields `/api/<namespace>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiPrefix(String);

impl ApiPrefix {
    /// Creates a validated API prefix.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::EmptyApiPrefix`] for blank input and
    /// [`RegistryDomainError::InvalidApiPrefix`] when the prefix ends with
    /// `/` or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, RegistryDomainError> {
        let trimmed = value.into().trim().to_owned();

        if trimmed.is_empty() {
            return Err(RegistryDomainError::EmptyApiPrefix);
        }

        if trimmed.ends_with('/') || trimmed.chars().any(char::is_whitespace) {
            return Err(RegistryDomainError::InvalidApiPrefix(trimmed));
        }

        Ok(Self(trimmed))
    }

    /// Returns the prefix as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ApiPrefix {
    fn default() -> Self {
        Self(DEFAULT_API_PREFIX.to_owned())
    }
}

impl TryFrom<String> for ApiPrefix {
    type Error = RegistryDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ApiPrefix> for String {
    fn from(prefix: ApiPrefix) -> Self {
        prefix.0
    }
}

impl AsRef<str> for ApiPrefix {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ApiPrefix {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Validates an adapter type tag, returning it trimmed.
///
/// # Errors
///
/// Returns [`RegistryDomainError::EmptyAdapterType`] for blank input.
pub fn validate_adapter_type(value: &str) -> Result<String, RegistryDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RegistryDomainError::EmptyAdapterType);
    }
    Ok(trimmed.to_owned())
}
