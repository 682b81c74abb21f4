//! # quiesce
//!
//! **quiesce** is a suspend/resume coordination barrier for multi-isolate
//! application runtimes.
//!
//! An operator pauses all managed activity (for example before device
//! standby) and later resumes it. Independently running subsystems and
//! applications can delay completion of the pause by holding a
//! [`Dependency`] until they have quiesced.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   driver ── request_suspend() / request_resume()
//!      │
//!      ▼
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  Arc<dyn Coordinator>  (one per isolate, built by SuspendSystem)   │
//! │                                                                    │
//! │   DependencyBarrier                      AdminCoordinator          │
//! │   - state: Active/Suspending/Suspended   (admin isolate only)      │
//! │   - DependencySet (tokens)               - wraps a barrier         │
//! │   - ListenerSet (newest first)           - AdminPolicy hooks       │
//! │   - Sequencer (queued fan-outs)          - RegistryListener        │
//! └───────┬───────────────────────────────────────┬────────────────────┘
//!         │ on_suspended / on_resumed             │ report_cycle_outcome
//!         ▼                                       ▼ consume_kill_latch
//!   SuspendListener × N                     NativeSuspend
//!                                                 │ latch set?
//!                                                 ▼
//!                                   AlertPresenter (own tokio task)
//!
//!   every transition ── publish(Event) ──► Bus ──► SubscriberSet ──► Subscribe × N
//! ```
//!
//! ### Lifecycle
//! ```text
//! Active ──request_suspend()──► Suspending ──last token released──► Suspended
//!   ▲                              (empty set: closes immediately)      │
//!   └─────────────────────────────request_resume()──────────────────────┘
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                              |
//! |-------------------|--------------------------------------------------------------|-------------------------------------------------|
//! | **Barrier**       | Per-isolate state machine gated by dependency tokens.        | [`DependencyBarrier`], [`Dependency`]           |
//! | **Listeners**     | Synchronous suspend/resume observers, panic-isolated.        | [`SuspendListener`]                             |
//! | **Administration**| Registry-driven tokens, cycle outcome, kill alert.           | [`AdminCoordinator`], [`RegistryListener`]      |
//! | **Factory**       | One coordinator per isolate, permission-gated access.        | [`SuspendSystem`], [`Coordinator`]              |
//! | **Events**        | Broadcast of every transition for observability.             | [`Event`], [`Bus`], [`Subscribe`]               |
//! | **Errors**        | Typed usage/timeout/access errors.                           | [`CoordinatorError`], [`AccessError`]           |
//! | **Configuration** | Centralized settings.                                        | [`Config`]                                      |
//!
//! ## Optional features
//! - `logging`: exports the built-in [`LogWriter`] subscriber.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use quiesce::{Config, CoordinationState, Dependency, IsolateId, SuspendListener, SuspendSystem};
//!
//! #[derive(Default)]
//! struct Counter(AtomicUsize);
//!
//! impl SuspendListener for Counter {
//!     fn on_suspended(&self) { self.0.fetch_add(1, Ordering::SeqCst); }
//!     fn on_resumed(&self) {}
//! }
//!
//! let system = SuspendSystem::builder(Config::default(), IsolateId(3)).build().unwrap();
//! let coord = system.coordinator();
//! let counter = Arc::new(Counter::default());
//! coord.add_listener(counter.clone());
//!
//! let io = Dependency::new("io-flush");
//! coord.add_dependency(&io);
//! coord.request_suspend().unwrap();
//! assert_eq!(counter.0.load(Ordering::SeqCst), 0);
//!
//! coord.remove_dependency(&io);
//! assert_eq!(coord.state(), CoordinationState::Suspended);
//! assert_eq!(counter.0.load(Ordering::SeqCst), 1);
//!
//! coord.request_resume().unwrap();
//! assert_eq!(coord.state(), CoordinationState::Active);
//! ```

pub mod admin;
mod barrier;
mod config;
mod error;
mod events;
mod isolate;
mod subscribers;
mod system;

// ---- Public re-exports ----

pub use admin::{
    AdminCoordinator, Alert, AlertPresenter, AlertText, AppId, AppRef, InProcessNative,
    KillLatch, LogPresenter, NativeSuspend, RegistryListener,
};
pub use barrier::{
    CoordinationState, CycleHooks, Dependency, DependencyBarrier, DependencyId, DependencySet,
    ListenerSet, SuspendListener, Transition,
};
pub use config::Config;
pub use error::{AccessError, BuildError, CoordinatorError};
pub use events::{Bus, Event, EventKind};
pub use isolate::IsolateId;
pub use subscribers::{Subscribe, SubscriberSet};
pub use system::{Coordinator, Permission, SecurityToken, SuspendSystem, SuspendSystemBuilder};

#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
