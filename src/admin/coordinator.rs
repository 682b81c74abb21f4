//! # AdminCoordinator: the barrier of the administrative isolate.
//!
//! Exactly one isolate in the runtime runs this coordinator. It wraps a
//! [`DependencyBarrier`] by delegation and installs [`AdminPolicy`] as the
//! barrier's [`CycleHooks`], so every barrier invariant holds unchanged.
//!
//! ## What it adds
//! ```text
//! registry ── application_added(app)   ─► track app (fresh token, armed now)
//!                                          └► app in admin isolate? ─► surface kill-latch
//!          ── application_paused(app)  ─► foreign isolate? ─► any_paused = true
//!                                          └► release app token
//!          ── application_removed(app) ─► any_killed = true; forget app; release token
//!
//! suspend_begin   ─► clear flags; re-arm tokens of all tracked apps
//! after_suspended ─► native.report_cycle_outcome(any_killed && !any_paused)
//! after_resumed   ─► native.consume_kill_latch()? ─► dispatch warning (own task)
//! ```
//!
//! Flags are written before the token is released, so the thread that closes
//! the barrier always observes the callback that closed it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::alert::{AlertDispatcher, AlertPresenter, AlertText};
use super::apps::{AppId, AppRef, RegistryListener};
use super::native::NativeSuspend;
use crate::barrier::{CycleHooks, Dependency, DependencyBarrier, DependencySet};
use crate::events::{Bus, Event, EventKind};
use crate::isolate::IsolateId;

/// Per-cycle bookkeeping and kill-alert policy.
pub(crate) struct AdminPolicy {
    admin_isolate: IsolateId,
    any_killed: AtomicBool,
    any_paused: AtomicBool,
    cycle: AtomicU64,
    /// Token of every running application.
    apps: Mutex<HashMap<AppId, Dependency>>,
    native: Arc<dyn NativeSuspend>,
    alerts: AlertDispatcher,
    kill_alert: AlertText,
    bus: Bus,
}

impl AdminPolicy {
    fn apps(&self) -> MutexGuard<'_, HashMap<AppId, Dependency>> {
        self.apps.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Surfaces the kill-latch if the native layer has it set.
    fn alert_if_all_killed(&self) -> Option<JoinHandle<()>> {
        if !self.native.consume_kill_latch() {
            return None;
        }
        info!(isolate = %self.admin_isolate, "previous suspend killed every application; alerting");
        Some(self.alerts.dispatch(self.kill_alert.warning()))
    }
}

impl CycleHooks for AdminPolicy {
    fn suspend_begin(&self, deps: &mut DependencySet) {
        self.any_killed.store(false, Ordering::SeqCst);
        self.any_paused.store(false, Ordering::SeqCst);
        self.cycle.fetch_add(1, Ordering::SeqCst);

        for dep in self.apps().values() {
            deps.insert(dep);
        }
    }

    fn after_suspended(&self) {
        let killed = self.any_killed.load(Ordering::SeqCst);
        let paused = self.any_paused.load(Ordering::SeqCst);
        let all_killed = killed && !paused;

        info!(killed, paused, all_killed, "reporting cycle outcome");
        self.native.report_cycle_outcome(all_killed);
        self.bus.publish(
            Event::new(EventKind::CycleOutcome)
                .with_isolate(self.admin_isolate.get())
                .with_cycle(self.cycle.load(Ordering::SeqCst))
                .with_outcome(all_killed),
        );
    }

    fn after_resumed(&self) {
        let _ = self.alert_if_all_killed();
    }
}

/// Coordinator of the administrative isolate.
pub struct AdminCoordinator {
    barrier: DependencyBarrier,
    policy: Arc<AdminPolicy>,
}

impl AdminCoordinator {
    /// Creates the coordinator. Alerts are spawned on `runtime`.
    pub fn new(
        admin_isolate: IsolateId,
        bus: Bus,
        native: Arc<dyn NativeSuspend>,
        presenter: Arc<dyn AlertPresenter>,
        runtime: Handle,
        kill_alert: AlertText,
    ) -> Self {
        let policy = Arc::new(AdminPolicy {
            admin_isolate,
            any_killed: AtomicBool::new(false),
            any_paused: AtomicBool::new(false),
            cycle: AtomicU64::new(0),
            apps: Mutex::new(HashMap::new()),
            native,
            alerts: AlertDispatcher::new(presenter, runtime, bus.clone()),
            kill_alert,
            bus: bus.clone(),
        });
        let hooks: Arc<dyn CycleHooks> = policy.clone();
        Self {
            barrier: DependencyBarrier::with_hooks(admin_isolate, bus, hooks),
            policy,
        }
    }

    /// The wrapped barrier.
    #[inline]
    pub fn barrier(&self) -> &DependencyBarrier {
        &self.barrier
    }

    #[inline]
    pub fn admin_isolate(&self) -> IsolateId {
        self.policy.admin_isolate
    }

    /// True if an application was removed since the current cycle began.
    pub fn any_app_killed(&self) -> bool {
        self.policy.any_killed.load(Ordering::SeqCst)
    }

    /// True if an application outside the admin isolate paused since the current cycle began.
    pub fn any_app_paused(&self) -> bool {
        self.policy.any_paused.load(Ordering::SeqCst)
    }

    /// Number of applications currently holding a token.
    pub fn tracked_applications(&self) -> usize {
        self.policy.apps().len()
    }

    /// Token of a tracked application.
    pub fn application_dependency(&self, app: AppId) -> Option<Dependency> {
        self.policy.apps().get(&app).cloned()
    }

    /// Consumes the kill-latch and, if it was set, dispatches the warning.
    ///
    /// Returns the presentation task so callers may await it; dropping it is fine.
    pub fn alert_if_all_killed(&self) -> Option<JoinHandle<()>> {
        self.policy.alert_if_all_killed()
    }

    fn publish(&self, kind: EventKind, app: &AppRef) {
        self.policy.bus.publish(
            Event::new(kind)
                .with_isolate(app.isolate.get())
                .with_subject(app.id.to_string()),
        );
    }
}

impl RegistryListener for AdminCoordinator {
    fn application_added(&self, app: &AppRef) {
        let fresh = {
            let mut apps = self.policy.apps();
            if apps.contains_key(&app.id) {
                None
            } else {
                let dep = Dependency::new(app.id.to_string());
                apps.insert(app.id, dep.clone());
                Some(dep)
            }
        };
        if let Some(dep) = fresh {
            self.barrier.add_dependency(&dep);
        }
        debug!(app = %app.id, isolate = %app.isolate, "application added");
        self.publish(EventKind::AppAdded, app);

        if app.isolate == self.policy.admin_isolate {
            let _ = self.policy.alert_if_all_killed();
        }
    }

    fn application_paused(&self, app: &AppRef) {
        if app.isolate != self.policy.admin_isolate {
            self.policy.any_paused.store(true, Ordering::SeqCst);
        }
        let dep = self.policy.apps().get(&app.id).cloned();
        debug!(app = %app.id, isolate = %app.isolate, tracked = dep.is_some(), "application paused");
        self.publish(EventKind::AppPaused, app);

        if let Some(dep) = dep {
            self.barrier.remove_dependency(&dep);
        }
    }

    fn application_removed(&self, app: &AppRef) {
        self.policy.any_killed.store(true, Ordering::SeqCst);
        let dep = self.policy.apps().remove(&app.id);
        debug!(app = %app.id, isolate = %app.isolate, tracked = dep.is_some(), "application removed");
        self.publish(EventKind::AppRemoved, app);

        if let Some(dep) = dep {
            self.barrier.remove_dependency(&dep);
        }
    }
}
