//! # Suspend/resume listeners.
//!
//! Provides [`SuspendListener`], the observer notified when the barrier closes
//! and when it reopens, and [`ListenerSet`], the ordered registry that fans
//! notifications out.
//!
//! ## Rules
//! - Notification order is the **reverse** of registration order: the most
//!   recently registered listener hears first.
//! - Callbacks run synchronously on the thread that completed the transition.
//! - The fan-out works on a snapshot, so registering a listener while a
//!   fan-out is running is safe; the new listener is not part of that round.
//! - A panic in one listener is caught, logged and published as
//!   `EventKind::ListenerPanicked`; the remaining listeners are still notified.
//!
//! ## Example
//! ```rust
//! use quiesce::SuspendListener;
//!
//! struct Display;
//!
//! impl SuspendListener for Display {
//!     fn on_suspended(&self) { /* release the frame buffer */ }
//!     fn on_resumed(&self) { /* repaint */ }
//!     fn name(&self) -> &'static str { "display" }
//! }
//! ```

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::warn;

use crate::events::{Bus, Event, panic_message};

/// Observer of suspend/resume completions.
///
/// ### Implementation requirements
/// - Return promptly; the caller's thread is the one finishing the transition.
/// - Callbacks may release dependencies, register listeners or request the
///   next transition. A round triggered from a callback is delivered after
///   the current round completes, on the same thread.
pub trait SuspendListener: Send + Sync + 'static {
    /// Called once per cycle after every dependency has been released.
    fn on_suspended(&self);

    /// Called once per resume.
    fn on_resumed(&self);

    /// Name used in logs and panic events.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Which notification a fan-out delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Notification {
    Suspended,
    Resumed,
}

/// Ordered, append-only listener registry.
pub struct ListenerSet {
    listeners: RwLock<Vec<Arc<dyn SuspendListener>>>,
    bus: Bus,
}

impl ListenerSet {
    pub(crate) fn new(bus: Bus) -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            bus,
        }
    }

    /// Appends a listener. There is no removal; registration lasts for the process.
    pub fn register(&self, listener: Arc<dyn SuspendListener>) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notifies every listener, newest first. Returns how many panicked.
    pub(crate) fn notify(&self, what: Notification) -> usize {
        let snapshot: Vec<Arc<dyn SuspendListener>> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut panicked = 0;
        for listener in snapshot.iter().rev() {
            let res = catch_unwind(AssertUnwindSafe(|| match what {
                Notification::Suspended => listener.on_suspended(),
                Notification::Resumed => listener.on_resumed(),
            }));
            if let Err(payload) = res {
                panicked += 1;
                let info = panic_message(&*payload);
                warn!(listener = listener.name(), ?what, panic = %info, "suspend listener panicked");
                self.bus
                    .publish(Event::listener_panicked(listener.name(), info));
            }
        }
        panicked
    }
}
