//! # Coordinator configuration.
//!
//! Provides [`Config`] centralized settings read once by
//! [`SuspendSystem::builder`](crate::SuspendSystem::builder).
//!
//! ## Sentinel values
//! - `suspend_grace = 0s` → wait for stragglers without limit
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

use crate::admin::AlertText;
use crate::isolate::IsolateId;

/// Runtime-wide settings for the suspend system.
///
/// ## Field semantics
/// - `admin_isolate`: the one isolate that builds the administrative coordinator
/// - `bus_capacity`: event bus ring buffer size (min 1)
/// - `suspend_grace`: default bound for [`Coordinator::wait_suspended`](crate::Coordinator::wait_suspended)
/// - `kill_alert`: text of the warning shown when a suspend killed every application
#[derive(Clone, Debug)]
pub struct Config {
    /// Isolate responsible for whole-runtime lifecycle policy.
    pub admin_isolate: IsolateId,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,

    /// How long a driver waits for dependencies to drain.
    ///
    /// - `Duration::ZERO` = no limit
    /// - `> 0` = `wait_suspended` fails with `SuspendTimeout` after this long
    pub suspend_grace: Duration,

    /// Title and message of the all-applications-killed warning.
    pub kill_alert: AlertText,
}

impl Config {
    /// Returns the suspend grace as an `Option` (`None` → no limit).
    #[inline]
    pub fn grace(&self) -> Option<Duration> {
        if self.suspend_grace == Duration::ZERO {
            None
        } else {
            Some(self.suspend_grace)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// True if `isolate` is the administrative isolate.
    #[inline]
    pub fn is_admin(&self, isolate: IsolateId) -> bool {
        isolate == self.admin_isolate
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `admin_isolate = IsolateId(1)`
    /// - `bus_capacity = 1024`
    /// - `suspend_grace = 30s`
    /// - `kill_alert = AlertText::default()`
    fn default() -> Self {
        Self {
            admin_isolate: IsolateId(1),
            bus_capacity: 1024,
            suspend_grace: Duration::from_secs(30),
            kill_alert: AlertText::default(),
        }
    }
}
