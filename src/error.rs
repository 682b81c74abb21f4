//! Error types used by the suspend coordinators.
//!
//! This module defines three error enums:
//!
//! - [`CoordinatorError`]: errors raised while driving the state machine.
//! - [`AccessError`]: errors raised by the permission gate in front of the instance.
//! - [`BuildError`]: errors raised while constructing or installing a system.
//!
//! All of them provide `as_label` (stable snake_case for logs/metrics).
//! Releasing an unknown dependency is not an error and has no variant here.

use std::time::Duration;
use thiserror::Error;

use crate::barrier::{CoordinationState, Transition};
use crate::system::Permission;

/// # Errors produced while driving a coordinator.
///
/// `InvalidTransition` is a programming error in the driver: the state is left
/// untouched and the call is reported instead of silently ignored.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    /// A suspend or resume was requested from a state that does not allow it.
    #[error("cannot {op} while {state}")]
    InvalidTransition {
        /// Requested operation.
        op: Transition,
        /// State the coordinator was in.
        state: CoordinationState,
    },

    /// Outstanding dependencies did not drain within the grace period.
    #[error("suspend not reached within {grace:?}; outstanding: {outstanding:?}")]
    SuspendTimeout {
        /// The grace period that elapsed.
        grace: Duration,
        /// Labels of the dependencies still holding the barrier.
        outstanding: Vec<String>,
    },
}

impl CoordinatorError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use quiesce::{CoordinationState, CoordinatorError, Transition};
    ///
    /// let err = CoordinatorError::InvalidTransition {
    ///     op: Transition::Resume,
    ///     state: CoordinationState::Active,
    /// };
    /// assert_eq!(err.as_label(), "coordinator_invalid_transition");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CoordinatorError::InvalidTransition { .. } => "coordinator_invalid_transition",
            CoordinatorError::SuspendTimeout { .. } => "coordinator_suspend_timeout",
        }
    }

    /// True for errors that indicate a bug in the caller rather than a slow dependency.
    pub fn is_usage_error(&self) -> bool {
        matches!(self, CoordinatorError::InvalidTransition { .. })
    }
}

/// # Errors produced by the access gate.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The presented token lacks the required permission.
    #[error("permission denied: {permission:?} required")]
    PermissionDenied {
        /// Permission that was checked.
        permission: Permission,
    },

    /// No system was installed for this process.
    #[error("suspend system not installed")]
    NotInstalled,
}

impl AccessError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            AccessError::PermissionDenied { .. } => "access_permission_denied",
            AccessError::NotInstalled => "access_not_installed",
        }
    }
}

/// # Errors produced while building or installing a system.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// The administrative coordinator or subscribers need a tokio runtime and none was found.
    #[error("no tokio runtime available")]
    NoRuntime,

    /// A system was already installed for this process.
    #[error("suspend system already installed")]
    AlreadyInstalled,
}

impl BuildError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            BuildError::NoRuntime => "build_no_runtime",
            BuildError::AlreadyInstalled => "build_already_installed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_transition_message() {
        let err = CoordinatorError::InvalidTransition {
            op: Transition::Suspend,
            state: CoordinationState::Suspending,
        };
        assert_eq!(err.to_string(), "cannot suspend while suspending");
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_timeout_is_not_usage_error() {
        let err = CoordinatorError::SuspendTimeout {
            grace: Duration::from_secs(1),
            outstanding: vec!["app:7".into()],
        };
        assert!(!err.is_usage_error());
        assert_eq!(err.as_label(), "coordinator_suspend_timeout");
    }

    #[test]
    fn test_access_labels() {
        let err = AccessError::PermissionDenied {
            permission: Permission::Runtime,
        };
        assert_eq!(err.as_label(), "access_permission_denied");
        assert_eq!(AccessError::NotInstalled.as_label(), "access_not_installed");
        assert_eq!(BuildError::NoRuntime.as_label(), "build_no_runtime");
    }
}
