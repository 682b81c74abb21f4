use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use quiesce::{
    Alert, AlertPresenter, AlertText, AppRef, Config, CoordinationState, CoordinatorError,
    Dependency, Event, EventKind, InProcessNative, IsolateId, NativeSuspend, RegistryListener,
    Subscribe, SuspendSystem,
};

const ADMIN: IsolateId = IsolateId(1);

struct Capture(mpsc::UnboundedSender<Alert>);

#[async_trait]
impl AlertPresenter for Capture {
    async fn present(&self, alert: Alert) {
        let _ = self.0.send(alert);
    }
}

struct Harness {
    system: SuspendSystem,
    native: Arc<InProcessNative>,
    alerts: mpsc::UnboundedReceiver<Alert>,
}

fn admin_system() -> Harness {
    let native = Arc::new(InProcessNative::new());
    let (tx, alerts) = mpsc::unbounded_channel();
    let system = SuspendSystem::builder(Config::default(), ADMIN)
        .with_native(native.clone())
        .with_presenter(Arc::new(Capture(tx)))
        .build()
        .unwrap();
    Harness {
        system,
        native,
        alerts,
    }
}

async fn no_alert(rx: &mut mpsc::UnboundedReceiver<Alert>) -> bool {
    tokio::time::timeout(Duration::from_millis(50), rx.recv())
        .await
        .is_err()
}

#[tokio::test]
async fn scenario_b_a_pause_anywhere_means_not_all_killed() {
    let mut h = admin_system();
    let admin = h.system.admin().unwrap().clone();
    let a = AppRef::new(1, IsolateId(2));
    let b = AppRef::new(2, IsolateId(3));
    let c = AppRef::new(3, IsolateId(4));
    for app in [&a, &b, &c] {
        admin.application_added(app);
    }

    let coord = h.system.coordinator();
    coord.request_suspend().unwrap();
    assert_eq!(coord.state(), CoordinationState::Suspending);

    admin.application_paused(&a);
    admin.application_removed(&b);
    assert_eq!(coord.state(), CoordinationState::Suspending);
    admin.application_paused(&c);

    assert_eq!(coord.state(), CoordinationState::Suspended);
    assert!(admin.any_app_killed());
    assert!(admin.any_app_paused());
    assert_eq!(h.native.reports(), 1);
    assert!(!h.native.last_outcome());

    coord.request_resume().unwrap();
    assert!(no_alert(&mut h.alerts).await);
}

#[tokio::test]
async fn scenario_c_every_app_killed_alerts_once() {
    let mut h = admin_system();
    let admin = h.system.admin().unwrap().clone();
    let a = AppRef::new(1, IsolateId(2));
    let b = AppRef::new(2, IsolateId(3));
    admin.application_added(&a);
    admin.application_added(&b);

    let coord = h.system.coordinator();
    coord.request_suspend().unwrap();
    admin.application_removed(&a);
    admin.application_removed(&b);

    assert_eq!(coord.state(), CoordinationState::Suspended);
    assert!(h.native.last_outcome());
    assert!(h.native.latch().is_set());

    coord.request_resume().unwrap();
    let alert = tokio::time::timeout(Duration::from_secs(1), h.alerts.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(alert, AlertText::default().warning());
    assert_eq!(&*alert.title, "Applications closed");

    assert!(!h.native.consume_kill_latch());
    assert!(no_alert(&mut h.alerts).await);
}

#[tokio::test]
async fn empty_registry_reports_not_all_killed() {
    let h = admin_system();
    let coord = h.system.coordinator();
    coord.request_suspend().unwrap();
    assert_eq!(coord.state(), CoordinationState::Suspended);
    assert_eq!(h.native.reports(), 1);
    assert!(!h.native.last_outcome());
}

#[tokio::test]
async fn builder_picks_variant_by_isolate() {
    let admin = SuspendSystem::builder(Config::default(), ADMIN)
        .build()
        .unwrap();
    assert!(admin.is_admin());
    assert!(admin.coordinator().as_admin().is_some());
    assert_eq!(admin.coordinator().isolate(), ADMIN);

    let plain = SuspendSystem::builder(Config::default(), IsolateId(6))
        .build()
        .unwrap();
    assert!(!plain.is_admin());
    assert!(plain.coordinator().as_admin().is_none());
    assert_eq!(plain.coordinator().isolate(), IsolateId(6));
}

#[tokio::test]
async fn suspend_and_wait_times_out_on_held_token() {
    let cfg = Config {
        suspend_grace: Duration::from_millis(30),
        ..Config::default()
    };
    let system = SuspendSystem::builder(cfg, IsolateId(5)).build().unwrap();
    let stuck = Dependency::new("stuck-writer");
    system.coordinator().add_dependency(&stuck);

    let err = system.suspend_and_wait().await.unwrap_err();
    match err {
        CoordinatorError::SuspendTimeout { outstanding, .. } => {
            assert_eq!(outstanding.len(), 1);
            assert!(outstanding[0].starts_with("stuck-writer"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(system.coordinator().state(), CoordinationState::Suspending);

    system.coordinator().remove_dependency(&stuck);
    system.coordinator().wait_suspended(None).await.unwrap();
}

#[tokio::test]
async fn resume_while_active_is_rejected() {
    let system = SuspendSystem::builder(Config::default(), IsolateId(5))
        .build()
        .unwrap();
    let err = system.coordinator().request_resume().unwrap_err();
    assert!(err.is_usage_error());
    assert_eq!(system.coordinator().state(), CoordinationState::Active);
}

struct Forward(mpsc::UnboundedSender<Event>);

#[async_trait]
impl Subscribe for Forward {
    async fn on_event(&self, ev: &Event) {
        let _ = self.0.send(ev.clone());
    }
}

#[tokio::test]
async fn subscribers_observe_transitions() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let system = SuspendSystem::builder(Config::default(), IsolateId(5))
        .with_subscribers(vec![Arc::new(Forward(tx)) as Arc<dyn Subscribe>])
        .build()
        .unwrap();

    system.coordinator().request_suspend().unwrap();

    let mut seen = Vec::new();
    while seen.len() < 2 {
        let ev = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        seen.push(ev.kind);
    }
    assert_eq!(seen, vec![EventKind::SuspendRequested, EventKind::Suspended]);
}

#[tokio::test]
async fn registry_callbacks_from_many_threads_report_once() {
    const APPS: u64 = 16;

    for round in 0..50 {
        let h = admin_system();
        let admin = Arc::clone(h.system.admin().unwrap());
        let apps: Vec<AppRef> = (0..APPS)
            .map(|i| AppRef::new(i, IsolateId(2 + i as u32)))
            .collect();
        for app in &apps {
            admin.application_added(app);
        }
        h.system.coordinator().request_suspend().unwrap();

        // every other round one app pauses instead of dying
        let pauser = (round % 2 == 0).then_some(round % APPS);
        let start = Arc::new(std::sync::Barrier::new(apps.len()));
        let handles: Vec<_> = apps
            .into_iter()
            .map(|app| {
                let admin = Arc::clone(&admin);
                let start = Arc::clone(&start);
                std::thread::spawn(move || {
                    start.wait();
                    if Some(app.id.0) == pauser {
                        admin.application_paused(&app);
                    } else {
                        admin.application_removed(&app);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(h.system.coordinator().state(), CoordinationState::Suspended);
        assert_eq!(h.native.reports(), 1);
        assert_eq!(h.native.last_outcome(), pauser.is_none());
        assert_eq!(admin.tracked_applications(), usize::from(pauser.is_some()));
    }
}
