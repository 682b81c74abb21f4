//! Coordinator events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `DependencyBarrier`, `AdminPolicy`, `SubscriberSet` workers.
//! - **Consumers**: the subscriber listener spawned by `SuspendSystemBuilder::build`,
//!   or anyone holding a receiver from [`Bus::subscribe`].

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
pub(crate) use event::panic_message;
