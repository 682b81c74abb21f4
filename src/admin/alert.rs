//! # User-facing alerts.
//!
//! Alerts are presented fire-and-forget on their own tokio task so that the
//! resume path never waits for UI. A presenter panic is caught and published
//! as `EventKind::SubscriberPanicked`.
//!
//! ```text
//! AdminPolicy ──► AlertDispatcher::dispatch(alert)
//!                     └─► runtime.spawn(presenter.present(alert))   (independent task)
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::events::{Bus, Event, EventKind, panic_message};

/// Warning shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: Arc<str>,
    pub message: Arc<str>,
}

/// Configurable text of an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertText {
    pub title: String,
    pub message: String,
}

impl AlertText {
    pub fn warning(&self) -> Alert {
        Alert {
            title: Arc::from(self.title.as_str()),
            message: Arc::from(self.message.as_str()),
        }
    }
}

impl Default for AlertText {
    fn default() -> Self {
        Self {
            title: "Applications closed".to_string(),
            message: "Suspending the device closed all running applications instead of pausing them."
                .to_string(),
        }
    }
}

/// Presentation layer for alerts.
#[async_trait]
pub trait AlertPresenter: Send + Sync + 'static {
    /// Shows the alert. Runs on a dedicated task; may take as long as the UI needs.
    async fn present(&self, alert: Alert);

    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Presenter that writes alerts to the log. Default when no UI is attached.
#[derive(Debug, Default)]
pub struct LogPresenter;

#[async_trait]
impl AlertPresenter for LogPresenter {
    async fn present(&self, alert: Alert) {
        warn!(title = %alert.title, "{}", alert.message);
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Spawns presentations on a runtime without awaiting them.
#[derive(Clone)]
pub(crate) struct AlertDispatcher {
    presenter: Arc<dyn AlertPresenter>,
    runtime: Handle,
    bus: Bus,
}

impl AlertDispatcher {
    pub(crate) fn new(presenter: Arc<dyn AlertPresenter>, runtime: Handle, bus: Bus) -> Self {
        Self {
            presenter,
            runtime,
            bus,
        }
    }

    pub(crate) fn dispatch(&self, alert: Alert) -> JoinHandle<()> {
        self.bus
            .publish(Event::new(EventKind::KillAlertRaised).with_reason(Arc::clone(&alert.title)));

        let presenter = Arc::clone(&self.presenter);
        let bus = self.bus.clone();
        self.runtime.spawn(async move {
            let fut = presenter.present(alert);
            if let Err(payload) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                let info = panic_message(&*payload);
                warn!(presenter = presenter.name(), panic = %info, "alert presenter panicked");
                bus.publish(Event::subscriber_panicked(presenter.name(), info));
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture(Mutex<Vec<Alert>>);

    #[async_trait]
    impl AlertPresenter for Capture {
        async fn present(&self, alert: Alert) {
            self.0.lock().unwrap().push(alert);
        }
    }

    struct Broken;

    #[async_trait]
    impl AlertPresenter for Broken {
        async fn present(&self, _alert: Alert) {
            panic!("no display");
        }
        fn name(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_dispatch_presents_on_task() {
        let capture = Arc::new(Capture::default());
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let d = AlertDispatcher::new(capture.clone(), Handle::current(), bus);

        d.dispatch(AlertText::default().warning()).await.unwrap();

        let shown = capture.0.lock().unwrap().clone();
        assert_eq!(shown.len(), 1);
        assert_eq!(&*shown[0].message, &*AlertText::default().message);
        assert_eq!(&*shown[0].title, "Applications closed");
        assert_eq!(rx.try_recv().unwrap().kind, EventKind::KillAlertRaised);
    }

    #[tokio::test]
    async fn test_presenter_panic_is_contained() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let d = AlertDispatcher::new(Arc::new(Broken), Handle::current(), bus);

        d.dispatch(AlertText::default().warning()).await.unwrap();

        assert_eq!(rx.try_recv().unwrap().kind, EventKind::KillAlertRaised);
        let ev = rx.try_recv().unwrap();
        assert_eq!(ev.kind, EventKind::SubscriberPanicked);
        assert_eq!(ev.subject.as_deref(), Some("broken"));
    }
}
