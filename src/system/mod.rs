//! # SuspendSystem: the per-isolate entry point.
//!
//! Built once at startup by [`SuspendSystem::builder`], which compares the
//! current isolate to [`Config::admin_isolate`] and picks the coordinator
//! variant. The result can be installed in a process-wide slot and fetched
//! later through the permission gate.
//!
//! ## Wiring
//! ```text
//! SuspendSystem::builder(cfg, isolate)
//!     ├─ isolate == cfg.admin_isolate ─► AdminCoordinator ─┐
//!     └─ otherwise                    ─► DependencyBarrier ┴─► Arc<dyn Coordinator>
//!     ├─ Bus (cfg.bus_capacity)
//!     └─ subscribers? ─► SubscriberSet + listener task
//!
//! .install()                          ─► process-wide slot (once)
//! SuspendSystem::instance(&token)     ─► token.check(Runtime) ─► &'static SuspendSystem
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use quiesce::{Config, CoordinationState, Dependency, IsolateId, SuspendSystem};
//!
//! // a non-administrative isolate needs no runtime
//! let system = SuspendSystem::builder(Config::default(), IsolateId(4)).build().unwrap();
//! let coord = system.coordinator();
//!
//! let flush = Dependency::new("flush");
//! coord.add_dependency(&flush);
//! coord.request_suspend().unwrap();
//! assert_eq!(coord.state(), CoordinationState::Suspending);
//!
//! coord.remove_dependency(&flush);
//! assert_eq!(coord.state(), CoordinationState::Suspended);
//! ```

mod access;
mod builder;
mod coordinator;

pub use access::{Permission, SecurityToken};
pub use builder::SuspendSystemBuilder;
pub use coordinator::Coordinator;

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::admin::AdminCoordinator;
use crate::config::Config;
use crate::error::{AccessError, BuildError, CoordinatorError};
use crate::events::Bus;
use crate::isolate::IsolateId;

static INSTANCE: OnceLock<SuspendSystem> = OnceLock::new();

/// Coordinator of this isolate plus its event bus.
pub struct SuspendSystem {
    coordinator: Arc<dyn Coordinator>,
    admin: Option<Arc<AdminCoordinator>>,
    bus: Bus,
    grace: Option<Duration>,
}

impl SuspendSystem {
    pub fn builder(cfg: Config, isolate: IsolateId) -> SuspendSystemBuilder {
        SuspendSystemBuilder::new(cfg, isolate)
    }

    #[inline]
    pub fn coordinator(&self) -> &Arc<dyn Coordinator> {
        &self.coordinator
    }

    /// The administrative coordinator, present only in the administrative isolate.
    #[inline]
    pub fn admin(&self) -> Option<&Arc<AdminCoordinator>> {
        self.admin.as_ref()
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.admin.is_some()
    }

    #[inline]
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Requests a suspend and waits up to the configured grace for it to complete.
    pub async fn suspend_and_wait(&self) -> Result<(), CoordinatorError> {
        self.coordinator.request_suspend()?;
        self.coordinator.wait_suspended(self.grace).await
    }

    /// Stores this system in the process-wide slot. Only the first call succeeds.
    pub fn install(self) -> Result<&'static SuspendSystem, BuildError> {
        match INSTANCE.set(self) {
            Ok(()) => INSTANCE.get().ok_or(BuildError::AlreadyInstalled),
            Err(_) => Err(BuildError::AlreadyInstalled),
        }
    }

    /// Returns the installed system after checking `token` for [`Permission::Runtime`].
    pub fn instance(token: &SecurityToken) -> Result<&'static SuspendSystem, AccessError> {
        token.check(Permission::Runtime)?;
        INSTANCE.get().ok_or(AccessError::NotInstalled)
    }
}
