//! # Coordination state machine.
//!
//! ```text
//!            request_suspend()          set drains to empty
//!   Active ───────────────────► Suspending ───────────────────► Suspended
//!     ▲                                                            │
//!     └──────────────────────── request_resume() ──────────────────┘
//! ```
//!
//! `Suspending` is the only state in which dependency membership gates
//! anything; tokens added while `Active` or `Suspended` wait for the next cycle.

use std::fmt;

/// Current phase of a coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoordinationState {
    /// Normal operation. Initial state.
    #[default]
    Active,
    /// A suspend was requested; waiting for outstanding dependencies.
    Suspending,
    /// Every dependency released and listeners told.
    Suspended,
}

impl CoordinationState {
    /// Returns a short stable label for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            CoordinationState::Active => "active",
            CoordinationState::Suspending => "suspending",
            CoordinationState::Suspended => "suspended",
        }
    }
}

impl fmt::Display for CoordinationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Driver operation that moves the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Suspend,
    Resume,
}

impl Transition {
    /// State the barrier must be in for this transition to be legal.
    pub(crate) fn required(self) -> CoordinationState {
        match self {
            Transition::Suspend => CoordinationState::Active,
            Transition::Resume => CoordinationState::Suspended,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Suspend => f.write_str("suspend"),
            Transition::Resume => f.write_str("resume"),
        }
    }
}
