//! Error types for registry domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryDomainError {
    /// The adapter namespace is empty or blank.
    #[error("adapter namespace must not be empty")]
    EmptyNamespace,

    /// The adapter namespace contains a path separator or any whitespace.
    #[error("adapter namespace '{0}' must not contain '/' or whitespace")]
    InvalidNamespace(String),

    /// The adapter namespace exceeds the 255-character limit.
    #[error("adapter namespace exceeds 255 character limit: {0}")]
    NamespaceTooLong(String),

    /// The adapter type tag is empty after trimming.
    #[error("adapter type must not be empty")]
    EmptyAdapterType,

    /// A service name is empty after trimming.
    #[error("service name must not be empty")]
    EmptyServiceName,

    /// A service name contains a path separator or whitespace.
    #[error("service name '{0}' must not contain '/' or whitespace")]
    InvalidServiceName(String),

    /// The API prefix is empty after trimming.
    #[error("API prefix must not be empty")]
    EmptyApiPrefix,

    /// The API prefix ends with a separator or contains whitespace.
    #[error("API prefix '{0}' must not end with '/' or contain whitespace")]
    InvalidApiPrefix(String),

    /// Transitioning between two adapter states is invalid.
    #[error("invalid adapter state transition: {from} -> {to}")]
    InvalidStateTransition {
        /// Current adapter state.
        from: String,
        /// Requested target state.
        to: String,
    },
}

/// Error returned while parsing an adapter state from its string form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown adapter state: {0}")]
pub struct ParseAdapterStateError(pub String);
