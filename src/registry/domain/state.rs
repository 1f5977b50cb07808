//! Per-adapter lifecycle state.

use super::ParseAdapterStateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a registered adapter.
///
/// `Registered -> Connecting -> {Mounted | ConnectFailed | MountFailed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterState {
    /// Recorded by the registry; the connect task has not started yet.
    Registered,
    /// Waiting for the adapter's connect operation to resolve.
    Connecting,
    /// Every declared service is mounted on the host.
    Mounted,
    /// Connect failed, timed out, or was cancelled.
    ConnectFailed,
    /// Connect succeeded but the host rejected a mount.
    MountFailed,
}

impl AdapterState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Connecting => "connecting",
            Self::Mounted => "mounted",
            Self::ConnectFailed => "connect_failed",
            Self::MountFailed => "mount_failed",
        }
    }

    /// Returns whether no further transitions can happen.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Mounted | Self::ConnectFailed | Self::MountFailed)
    }

    /// Returns whether transition to `target` is allowed.
    ///
    /// A registered adapter may fail before its connect task starts when the
    /// registry shuts down first.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Registered, Self::Connecting | Self::ConnectFailed)
                | (
                    Self::Connecting,
                    Self::Mounted | Self::ConnectFailed | Self::MountFailed
                )
        )
    }
}

impl fmt::Display for AdapterState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AdapterState {
    type Error = ParseAdapterStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "registered" => Ok(Self::Registered),
            "connecting" => Ok(Self::Connecting),
            "mounted" => Ok(Self::Mounted),
            "connect_failed" => Ok(Self::ConnectFailed),
            "mount_failed" => Ok(Self::MountFailed),
            _ => Err(ParseAdapterStateError(value.to_owned())),
        }
    }
}
