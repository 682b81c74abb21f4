use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use super::{Coordinator, SuspendSystem};
use crate::admin::{AdminCoordinator, AlertPresenter, InProcessNative, LogPresenter, NativeSuspend};
use crate::barrier::DependencyBarrier;
use crate::config::Config;
use crate::error::BuildError;
use crate::events::Bus;
use crate::isolate::IsolateId;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Builder for the suspend system of one isolate.
pub struct SuspendSystemBuilder {
    cfg: Config,
    isolate: IsolateId,
    subscribers: Vec<Arc<dyn Subscribe>>,
    native: Option<Arc<dyn NativeSuspend>>,
    presenter: Option<Arc<dyn AlertPresenter>>,
    runtime: Option<Handle>,
}

impl SuspendSystemBuilder {
    /// Creates a builder for `isolate` (the isolate this process runs as).
    pub fn new(cfg: Config, isolate: IsolateId) -> Self {
        Self {
            cfg,
            isolate,
            subscribers: Vec::new(),
            native: None,
            presenter: None,
            runtime: None,
        }
    }

    /// Sets event subscribers for observability.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Native power layer used by the administrative coordinator.
    ///
    /// Defaults to [`InProcessNative`]. Ignored outside the administrative isolate.
    pub fn with_native(mut self, native: Arc<dyn NativeSuspend>) -> Self {
        self.native = Some(native);
        self
    }

    /// Alert presenter used by the administrative coordinator.
    ///
    /// Defaults to [`LogPresenter`]. Ignored outside the administrative isolate.
    pub fn with_presenter(mut self, presenter: Arc<dyn AlertPresenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    /// Runtime for alert presentation and subscriber workers.
    ///
    /// Defaults to the runtime `build` is called from, if any.
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Builds the coordinator for the configured isolate.
    ///
    /// The administrative isolate gets an [`AdminCoordinator`]; every other
    /// isolate a plain [`DependencyBarrier`]. The choice is made here, once.
    pub fn build(self) -> Result<SuspendSystem, BuildError> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let is_admin = self.cfg.is_admin(self.isolate);
        let runtime = self.runtime.or_else(|| Handle::try_current().ok());

        if !self.subscribers.is_empty() {
            let rt = runtime.as_ref().ok_or(BuildError::NoRuntime)?;
            let set = Arc::new(SubscriberSet::new(self.subscribers, bus.clone(), rt));
            subscriber_listener(&bus, set, rt);
        }

        let (coordinator, admin) = if is_admin {
            let rt = runtime.ok_or(BuildError::NoRuntime)?;
            let admin = Arc::new(AdminCoordinator::new(
                self.isolate,
                bus.clone(),
                self.native
                    .unwrap_or_else(|| Arc::new(InProcessNative::new())),
                self.presenter.unwrap_or_else(|| Arc::new(LogPresenter)),
                rt,
                self.cfg.kill_alert.clone(),
            ));
            let coordinator: Arc<dyn Coordinator> = admin.clone();
            (coordinator, Some(admin))
        } else {
            let coordinator: Arc<dyn Coordinator> =
                Arc::new(DependencyBarrier::new(self.isolate, bus.clone()));
            (coordinator, None)
        };

        info!(isolate = %self.isolate, admin = is_admin, "suspend system built");
        Ok(SuspendSystem {
            coordinator,
            admin,
            bus,
            grace: self.cfg.grace(),
        })
    }
}

/// Forwards bus events to the subscriber set (fire-and-forget).
fn subscriber_listener(bus: &Bus, set: Arc<SubscriberSet>, rt: &Handle) {
    let mut rx = bus.subscribe();
    rt.spawn(async move {
        loop {
            match rx.recv().await {
                Ok(ev) => set.emit(&ev),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "subscriber listener lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
