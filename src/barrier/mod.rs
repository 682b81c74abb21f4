//! Dependency barrier: the per-isolate quiescence mechanism.
//!
//! ## Contents
//! - [`CoordinationState`], [`Transition`] the state machine
//! - [`Dependency`], [`DependencySet`] tokens that hold the barrier open
//! - [`SuspendListener`], [`ListenerSet`] observers and their fan-out
//! - [`DependencyBarrier`], [`CycleHooks`] the barrier and its extension points

mod core;
mod dependency;
mod listener;
mod sequencer;
mod state;

pub use self::core::{CycleHooks, DependencyBarrier};
pub use dependency::{Dependency, DependencyId, DependencySet};
pub use listener::{ListenerSet, SuspendListener};
pub use state::{CoordinationState, Transition};
