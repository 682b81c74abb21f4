//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`]
//! fan-out for events broadcast through the [`Bus`](crate::Bus).
//!
//! ## Architecture
//! ```text
//! DependencyBarrier / AdminPolicy ── publish(Event) ──► Bus
//!                                                        │
//!                               subscriber listener ◄────┘
//!                                        │
//!                                  SubscriberSet::emit
//!                              ┌─────────┼─────────┐
//!                              ▼         ▼         ▼
//!                          LogWriter  Metrics   Custom
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
