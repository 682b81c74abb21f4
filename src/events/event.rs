//! # Events emitted by the coordinators.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Cycle events**: suspend/resume requested, suspended, resumed
//! - **Dependency events**: tokens added to / released from the barrier
//! - **Administrative events**: registry callbacks, cycle outcome, kill alert
//! - **Delivery events**: listener/subscriber panics and subscriber overflow
//!
//! The [`Event`] struct carries metadata such as timestamps, cycle number and
//! the subject (dependency, application or listener) the event is about.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use quiesce::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::DependencyReleased)
//!     .with_subject("app:7")
//!     .with_cycle(3);
//!
//! assert_eq!(ev.kind, EventKind::DependencyReleased);
//! assert_eq!(ev.subject.as_deref(), Some("app:7"));
//! assert_eq!(ev.cycle, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of coordinator events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Cycle events ===
    /// A suspend cycle began (`Active → Suspending`).
    ///
    /// Sets: `cycle`, `isolate`
    SuspendRequested,

    /// The barrier closed and the "suspended" fan-out completed.
    ///
    /// Sets: `cycle`, `isolate`
    Suspended,

    /// A resume was requested (`Suspended → Active`).
    ///
    /// Sets: `cycle`, `isolate`
    ResumeRequested,

    /// The "resumed" fan-out completed.
    ///
    /// Sets: `cycle`, `isolate`
    Resumed,

    // === Dependency events ===
    /// A token entered the dependency set.
    ///
    /// Sets: `subject` (token label), `isolate`
    DependencyAdded,

    /// A token left the dependency set.
    ///
    /// Sets: `subject` (token label), `isolate`
    DependencyReleased,

    // === Administrative events ===
    /// Registry reported an application as started.
    ///
    /// Sets: `subject` (application), `isolate` (owner)
    AppAdded,

    /// Registry reported that an application released its resources.
    ///
    /// Sets: `subject` (application), `isolate` (owner)
    AppPaused,

    /// Registry reported an application as terminated.
    ///
    /// Sets: `subject` (application), `isolate` (owner)
    AppRemoved,

    /// Outcome of a cycle was handed to the native layer.
    ///
    /// Sets: `cycle`, `all_killed`
    CycleOutcome,

    /// The all-applications-killed warning was dispatched.
    ///
    /// Sets: `reason` (alert title)
    KillAlertRaised,

    // === Delivery events ===
    /// A suspend listener panicked; the fan-out continued.
    ///
    /// Sets: `subject` (listener name), `reason` (panic message)
    ListenerPanicked,

    /// An event subscriber panicked during event processing.
    ///
    /// Sets: `subject` (subscriber name), `reason` (panic message)
    SubscriberPanicked,

    /// An event subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `subject` (subscriber name), `reason`
    SubscriberOverflow,
}

/// Coordinator event with optional metadata.
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Suspend cycle number (starting from 1).
    pub cycle: Option<u64>,
    /// Isolate the event concerns.
    pub isolate: Option<u32>,
    /// Dependency, application or listener the event is about.
    pub subject: Option<Arc<str>>,
    /// Human-readable detail.
    pub reason: Option<Arc<str>>,
    /// Cycle outcome reported to the native layer.
    pub all_killed: Option<bool>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            cycle: None,
            isolate: None,
            subject: None,
            reason: None,
            all_killed: None,
        }
    }

    #[inline]
    pub fn with_cycle(mut self, cycle: u64) -> Self {
        self.cycle = Some(cycle);
        self
    }

    #[inline]
    pub fn with_isolate(mut self, isolate: u32) -> Self {
        self.isolate = Some(isolate);
        self
    }

    #[inline]
    pub fn with_subject(mut self, subject: impl Into<Arc<str>>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[inline]
    pub fn with_outcome(mut self, all_killed: bool) -> Self {
        self.all_killed = Some(all_killed);
        self
    }

    /// Creates a listener panic event.
    #[inline]
    pub fn listener_panicked(listener: &'static str, info: String) -> Self {
        Event::new(EventKind::ListenerPanicked)
            .with_subject(listener)
            .with_reason(info)
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_subject(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_subject(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_panic(&self) -> bool {
        matches!(
            self.kind,
            EventKind::ListenerPanicked | EventKind::SubscriberPanicked
        )
    }
}

/// Renders a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
