//! # Native suspend signal.
//!
//! The native power layer consumes one boolean per cycle ("did the suspend
//! kill every application instead of pausing it?") and owns the kill-latch,
//! a one-shot flag the administrative coordinator reads and surfaces.
//!
//! ## Latch semantics
//! ```text
//! report_cycle_outcome(true) ──► latch = set
//! consume_kill_latch()       ──► true,  latch = clear
//! consume_kill_latch()       ──► false (until the next qualifying cycle)
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Boundary to the native power-management layer.
pub trait NativeSuspend: Send + Sync + 'static {
    /// Called once per cycle after the "suspended" fan-out.
    fn report_cycle_outcome(&self, all_applications_killed: bool);

    /// Returns `true` at most once per qualifying event, clearing the latch.
    fn consume_kill_latch(&self) -> bool;
}

/// One-shot flag with atomic consume-and-clear.
#[derive(Debug, Default)]
pub struct KillLatch {
    flag: AtomicBool,
}

impl KillLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Returns the previous value and clears it. Two racing readers never both see `true`.
    pub fn consume(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }

    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// In-process stand-in for the native layer.
///
/// Arms the latch whenever a cycle reports that every application was killed.
#[derive(Debug, Default)]
pub struct InProcessNative {
    latch: KillLatch,
    reports: AtomicU64,
    last_outcome: AtomicBool,
}

impl InProcessNative {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of outcomes reported so far.
    pub fn reports(&self) -> u64 {
        self.reports.load(Ordering::Acquire)
    }

    /// Most recently reported outcome (`false` before the first report).
    pub fn last_outcome(&self) -> bool {
        self.last_outcome.load(Ordering::Acquire)
    }

    pub fn latch(&self) -> &KillLatch {
        &self.latch
    }
}

impl NativeSuspend for InProcessNative {
    fn report_cycle_outcome(&self, all_applications_killed: bool) {
        self.last_outcome
            .store(all_applications_killed, Ordering::Release);
        if all_applications_killed {
            self.latch.set();
        }
        self.reports.fetch_add(1, Ordering::AcqRel);
    }

    fn consume_kill_latch(&self) -> bool {
        self.latch.consume()
    }
}
