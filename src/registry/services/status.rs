//! Observable per-adapter status.

use crate::registry::{
    domain::{AdapterState, RegistryDomainError},
    ports::{AdapterConnectError, MountHostError},
};
use std::time::Duration;
use thiserror::Error;

/// Why an adapter never became connected.
#[derive(Debug, Clone, Error)]
pub enum ConnectFailure {
    /// The adapter's connect operation returned an error.
    #[error(transparent)]
    Adapter(#[from] AdapterConnectError),
    /// The connect operation did not finish in time.
    #[error("connect timed out after {0:?}")]
    TimedOut(Duration),
    /// The registry shut down or the adapter was replaced first.
    #[error("connect cancelled")]
    Cancelled,
}

/// Why an adapter ended in a failed state.
#[derive(Debug, Clone, Error)]
pub enum AdapterFailure {
    /// Connect failed.
    #[error(transparent)]
    Connect(#[from] ConnectFailure),
    /// The host rejected a mount.
    #[error("failed to mount '{endpoint}': {source}")]
    Mount {
        /// Endpoint that could not be mounted.
        endpoint: String,
        /// Host error.
        source: MountHostError,
    },
}

/// Current lifecycle state of an adapter with its outcome.
#[derive(Debug, Clone)]
pub struct AdapterStatus {
    state: AdapterState,
    mounted_endpoints: Vec<String>,
    failure: Option<AdapterFailure>,
}

impl Default for AdapterStatus {
    fn default() -> Self {
        Self::registered()
    }
}

impl AdapterStatus {
    /// Creates the status of a freshly registered adapter.
    #[must_use]
    pub const fn registered() -> Self {
        Self {
            state: AdapterState::Registered,
            mounted_endpoints: Vec::new(),
            failure: None,
        }
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> AdapterState {
        self.state
    }

    /// Returns endpoints mounted so far, in mount order.
    #[must_use]
    pub fn mounted_endpoints(&self) -> &[String] {
        &self.mounted_endpoints
    }

    /// Returns the failure for `ConnectFailed` and `MountFailed` states.
    #[must_use]
    pub const fn failure(&self) -> Option<&AdapterFailure> {
        self.failure.as_ref()
    }

    /// Moves the adapter to `Connecting`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::InvalidStateTransition`] when the
    /// adapter is not `Registered`.
    pub fn begin_connecting(&mut self) -> Result<(), RegistryDomainError> {
        self.transition_to(AdapterState::Connecting)
    }

    /// Records a completed mount.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::InvalidStateTransition`] when the
    /// adapter is not `Connecting`.
    pub fn mark_mounted(&mut self, endpoints: Vec<String>) -> Result<(), RegistryDomainError> {
        self.transition_to(AdapterState::Mounted)?;
        self.mounted_endpoints = endpoints;
        Ok(())
    }

    /// Records a connect failure.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::InvalidStateTransition`] when the
    /// adapter already reached a terminal state.
    pub fn mark_connect_failed(
        &mut self,
        failure: ConnectFailure,
    ) -> Result<(), RegistryDomainError> {
        self.transition_to(AdapterState::ConnectFailed)?;
        self.failure = Some(AdapterFailure::Connect(failure));
        Ok(())
    }

    /// Records a host rejection along with the endpoints mounted before it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::InvalidStateTransition`] when the
    /// adapter is not `Connecting`.
    pub fn mark_mount_failed(
        &mut self,
        mounted_endpoints: Vec<String>,
        endpoint: String,
        source: MountHostError,
    ) -> Result<(), RegistryDomainError> {
        self.transition_to(AdapterState::MountFailed)?;
        self.mounted_endpoints = mounted_endpoints;
        self.failure = Some(AdapterFailure::Mount { endpoint, source });
        Ok(())
    }

    fn transition_to(&mut self, target: AdapterState) -> Result<(), RegistryDomainError> {
        if !self.state.can_transition_to(target) {
            return Err(RegistryDomainError::InvalidStateTransition {
                from: self.state.as_str().to_owned(),
                to: target.as_str().to_owned(),
            });
        }

        self.state = target;
        Ok(())
    }
}
