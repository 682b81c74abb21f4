//! # LogWriter: event printer
//!
//! A minimal subscriber that renders incoming [`Event`]s through `tracing`.
//!
//! ## Example output
//! ```text
//! INFO  [suspend-requested] cycle=3 isolate=1
//! DEBUG [dependency-released] dep="app:7#12"
//! INFO  [suspended] cycle=3 isolate=1
//! INFO  [cycle-outcome] cycle=3 all_killed=false
//! WARN  [listener-panicked] listener="display" info="boom"
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let subject = e.subject.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::SuspendRequested => {
                info!("[suspend-requested] cycle={:?} isolate={:?}", e.cycle, e.isolate);
            }
            EventKind::Suspended => {
                info!("[suspended] cycle={:?} isolate={:?}", e.cycle, e.isolate);
            }
            EventKind::ResumeRequested => {
                info!("[resume-requested] cycle={:?} isolate={:?}", e.cycle, e.isolate);
            }
            EventKind::Resumed => {
                info!("[resumed] cycle={:?} isolate={:?}", e.cycle, e.isolate);
            }
            EventKind::DependencyAdded => debug!("[dependency-added] dep={subject:?}"),
            EventKind::DependencyReleased => debug!("[dependency-released] dep={subject:?}"),
            EventKind::AppAdded => debug!("[app-added] app={subject} isolate={:?}", e.isolate),
            EventKind::AppPaused => info!("[app-paused] app={subject} isolate={:?}", e.isolate),
            EventKind::AppRemoved => info!("[app-removed] app={subject} isolate={:?}", e.isolate),
            EventKind::CycleOutcome => {
                info!("[cycle-outcome] cycle={:?} all_killed={:?}", e.cycle, e.all_killed);
            }
            EventKind::KillAlertRaised => warn!("[kill-alert] title={:?}", e.reason),
            EventKind::ListenerPanicked => {
                warn!(
                    "[listener-panicked] listener={subject:?} info={:?}",
                    e.reason.as_deref().unwrap_or("unknown")
                );
            }
            EventKind::SubscriberPanicked => {
                warn!(
                    "[subscriber-panicked] subscriber={subject:?} info={:?}",
                    e.reason.as_deref().unwrap_or("unknown")
                );
            }
            EventKind::SubscriberOverflow => {
                warn!("[subscriber-overflow] subscriber={subject:?} reason={:?}", e.reason);
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
