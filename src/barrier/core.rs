//! # DependencyBarrier: per-isolate suspend/resume state machine.
//!
//! Holds the coordination state, the set of outstanding [`Dependency`] tokens
//! and the [`ListenerSet`]. A suspend request moves the barrier to
//! `Suspending`; the thread that releases the last token (or the requesting
//! thread, when nothing is outstanding) closes it and tells the listeners.
//!
//! ## Locks
//! ```text
//! inner: Mutex<Inner>          (state, deps, cycle)   decisions + mutations
//! listeners: RwLock<Vec<..>>   registration; fan-out uses a snapshot
//! rounds: Sequencer<Round>     FIFO of pending fan-outs, one deliverer at a time
//! ```
//! `inner` is never held while listeners run. The only code executed under it
//! is [`CycleHooks::suspend_begin`]. Rounds are queued under `inner`, so they
//! are delivered in transition order. No operation waits for another thread's
//! round: if one is being delivered, the new round is queued behind it and the
//! caller returns.
//!
//! ## Flow
//! ```text
//! request_suspend():  lock ─► Active? ─► Suspending ─► hooks.suspend_begin(&mut deps)
//!                          └► deps empty? ─► Suspended + queue round ─► unlock ─► drain
//! remove_dependency(): lock ─► deps.remove ─► Suspending && empty? ─► Suspended + queue round
//!                          ─► unlock ─► drain
//! request_resume():   lock ─► Suspended? ─► Active ─► hooks.resume_begin ─► queue round
//!                          ─► unlock ─► drain (fan-out resumed ─► hooks.after_resumed)
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::dependency::{Dependency, DependencySet};
use super::listener::{ListenerSet, Notification, SuspendListener};
use super::sequencer::Sequencer;
use super::state::{CoordinationState, Transition};
use crate::error::CoordinatorError;
use crate::events::{Bus, Event, EventKind, panic_message};
use crate::isolate::IsolateId;

/// Extension points invoked around transitions.
///
/// The administrative coordinator installs its policy through this trait;
/// a plain barrier uses no-op hooks. Panics are caught and logged.
pub trait CycleHooks: Send + Sync + 'static {
    /// Runs under the state lock right after `Active → Suspending`.
    ///
    /// May insert tokens into `deps`; must not call back into the barrier.
    fn suspend_begin(&self, deps: &mut DependencySet) {
        let _ = deps;
    }

    /// Runs under the state lock right after `Suspended → Active`.
    fn resume_begin(&self) {}

    /// Runs after every listener heard "suspended".
    fn after_suspended(&self) {}

    /// Runs after every listener heard "resumed".
    fn after_resumed(&self) {}
}

/// Hooks of a plain barrier.
struct NoHooks;

impl CycleHooks for NoHooks {}

struct Inner {
    state: CoordinationState,
    deps: DependencySet,
    /// Number of suspend cycles started.
    cycle: u64,
}

/// A pending fan-out, tagged with its cycle.
#[derive(Debug, Clone, Copy)]
enum Round {
    Suspended(u64),
    Resumed(u64),
}

/// Quiescence barrier for one isolate.
pub struct DependencyBarrier {
    isolate: IsolateId,
    inner: Mutex<Inner>,
    listeners: ListenerSet,
    rounds: Sequencer<Round>,
    hooks: Arc<dyn CycleHooks>,
    bus: Bus,
    /// Last cycle whose "suspended" fan-out completed.
    suspended_tx: watch::Sender<u64>,
}

impl DependencyBarrier {
    /// Creates a plain barrier in `Active` state.
    pub fn new(isolate: IsolateId, bus: Bus) -> Self {
        Self::with_hooks(isolate, bus, Arc::new(NoHooks))
    }

    /// Creates a barrier whose transitions call into `hooks`.
    pub fn with_hooks(isolate: IsolateId, bus: Bus, hooks: Arc<dyn CycleHooks>) -> Self {
        let (suspended_tx, _rx) = watch::channel(0);
        Self {
            isolate,
            inner: Mutex::new(Inner {
                state: CoordinationState::Active,
                deps: DependencySet::new(),
                cycle: 0,
            }),
            listeners: ListenerSet::new(bus.clone()),
            rounds: Sequencer::new(),
            hooks,
            bus,
            suspended_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    pub fn isolate(&self) -> IsolateId {
        self.isolate
    }

    pub fn state(&self) -> CoordinationState {
        self.lock().state
    }

    /// Number of suspend cycles started so far.
    pub fn cycle(&self) -> u64 {
        self.lock().cycle
    }

    /// Sorted labels of the tokens still in the set.
    pub fn outstanding(&self) -> Vec<String> {
        self.lock().deps.labels()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Adds `dep` unless already present. No effect on the state machine.
    pub fn add_dependency(&self, dep: &Dependency) {
        let mut inner = self.lock();
        if inner.deps.insert(dep) {
            debug!(isolate = %self.isolate, dependency = dep.label(), state = %inner.state, "dependency added");
            self.bus.publish(
                Event::new(EventKind::DependencyAdded)
                    .with_isolate(self.isolate.get())
                    .with_subject(dep.label()),
            );
        }
    }

    /// Releases `dep` (no-op if absent) and closes the barrier if it was the last one.
    ///
    /// When this call closes the barrier, listeners are notified on this thread
    /// before it returns, unless a round is already being delivered elsewhere;
    /// then that thread delivers this one right after.
    pub fn remove_dependency(&self, dep: &Dependency) {
        let drain = {
            let mut inner = self.lock();
            if inner.deps.remove(dep) {
                debug!(
                    isolate = %self.isolate,
                    dependency = dep.label(),
                    remaining = inner.deps.len(),
                    "dependency released"
                );
                self.bus.publish(
                    Event::new(EventKind::DependencyReleased)
                        .with_isolate(self.isolate.get())
                        .with_subject(dep.label()),
                );
            }
            self.close_if_drained(&mut inner)
        };

        if drain {
            self.deliver();
        }
    }

    /// Starts a suspend cycle. Only legal from `Active`.
    ///
    /// With no outstanding tokens the barrier closes and listeners are
    /// notified before this returns. Called from inside a listener callback,
    /// the round is queued and delivered right after the current one.
    pub fn request_suspend(&self) -> Result<(), CoordinatorError> {
        let drain = {
            let mut inner = self.lock();
            self.check(Transition::Suspend, inner.state)?;

            inner.state = CoordinationState::Suspending;
            inner.cycle += 1;
            let cycle = inner.cycle;

            let hooks = &self.hooks;
            let deps = &mut inner.deps;
            self.guard_hook("suspend_begin", || hooks.suspend_begin(deps));

            info!(isolate = %self.isolate, cycle, outstanding = inner.deps.len(), "suspend requested");
            self.bus.publish(
                Event::new(EventKind::SuspendRequested)
                    .with_isolate(self.isolate.get())
                    .with_cycle(cycle),
            );
            self.close_if_drained(&mut inner)
        };

        if drain {
            self.deliver();
        }
        Ok(())
    }

    /// Resumes from `Suspended`. Unconditional: dependencies do not gate resume.
    pub fn request_resume(&self) -> Result<(), CoordinatorError> {
        let drain = {
            let mut inner = self.lock();
            self.check(Transition::Resume, inner.state)?;

            inner.state = CoordinationState::Active;
            self.guard_hook("resume_begin", || self.hooks.resume_begin());

            let cycle = inner.cycle;
            info!(isolate = %self.isolate, cycle, "resume requested");
            self.bus.publish(
                Event::new(EventKind::ResumeRequested)
                    .with_isolate(self.isolate.get())
                    .with_cycle(cycle),
            );
            self.rounds.push(Round::Resumed(cycle))
        };

        if drain {
            self.deliver();
        }
        Ok(())
    }

    /// Registers a listener; see [`ListenerSet::register`].
    pub fn add_listener(&self, listener: Arc<dyn SuspendListener>) {
        debug!(isolate = %self.isolate, listener = listener.name(), "listener registered");
        self.listeners.register(listener);
    }

    /// Resolves once the most recently started cycle has been suspended.
    ///
    /// Returns immediately if that already happened (or no cycle was ever
    /// started). `None` waits without limit.
    pub async fn wait_suspended(&self, grace: Option<Duration>) -> Result<(), CoordinatorError> {
        let target = self.cycle();
        let mut rx = self.suspended_tx.subscribe();
        let reached = async {
            let _ = rx.wait_for(|done| *done >= target).await;
        };

        match grace {
            None => {
                reached.await;
                Ok(())
            }
            Some(grace) => match tokio::time::timeout(grace, reached).await {
                Ok(()) => Ok(()),
                Err(_) => {
                    let outstanding = self.outstanding();
                    warn!(isolate = %self.isolate, ?grace, ?outstanding, "suspend grace exceeded");
                    Err(CoordinatorError::SuspendTimeout { grace, outstanding })
                }
            },
        }
    }

    /// Moves `Suspending → Suspended` if the set is empty and queues the finalize round.
    ///
    /// Returns `true` if the caller must deliver.
    fn close_if_drained(&self, inner: &mut Inner) -> bool {
        if inner.state == CoordinationState::Suspending && inner.deps.is_empty() {
            inner.state = CoordinationState::Suspended;
            self.rounds.push(Round::Suspended(inner.cycle))
        } else {
            false
        }
    }

    /// Delivers queued rounds in order; runs on the thread that found the queue idle.
    fn deliver(&self) {
        self.rounds.drain(|round| match round {
            Round::Suspended(cycle) => self.finalize(cycle),
            Round::Resumed(cycle) => self.announce_resumed(cycle),
        });
    }

    fn finalize(&self, cycle: u64) {
        let panicked = self.listeners.notify(Notification::Suspended);
        self.guard_hook("after_suspended", || self.hooks.after_suspended());
        info!(isolate = %self.isolate, cycle, panicked, "suspended");
        self.bus.publish(
            Event::new(EventKind::Suspended)
                .with_isolate(self.isolate.get())
                .with_cycle(cycle),
        );
        self.suspended_tx.send_replace(cycle);
    }

    fn announce_resumed(&self, cycle: u64) {
        let panicked = self.listeners.notify(Notification::Resumed);
        self.guard_hook("after_resumed", || self.hooks.after_resumed());
        info!(isolate = %self.isolate, cycle, panicked, "resumed");
        self.bus.publish(
            Event::new(EventKind::Resumed)
                .with_isolate(self.isolate.get())
                .with_cycle(cycle),
        );
    }

    fn check(&self, op: Transition, state: CoordinationState) -> Result<(), CoordinatorError> {
        if state == op.required() {
            return Ok(());
        }
        let err = CoordinatorError::InvalidTransition { op, state };
        error!(isolate = %self.isolate, %op, %state, label = err.as_label(), "illegal transition request");
        Err(err)
    }

    fn guard_hook(&self, stage: &'static str, f: impl FnOnce()) {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(f)) {
            let info = panic_message(&*payload);
            warn!(isolate = %self.isolate, stage, panic = %info, "cycle hook panicked");
            self.bus
                .publish(Event::listener_panicked(stage, info));
        }
    }
}
