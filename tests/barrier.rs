use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use quiesce::{
    Bus, CoordinationState, Dependency, DependencyBarrier, EventKind, IsolateId, SuspendListener,
};

#[derive(Default)]
struct Counter {
    suspended: AtomicUsize,
    resumed: AtomicUsize,
}

impl SuspendListener for Counter {
    fn on_suspended(&self) {
        self.suspended.fetch_add(1, Ordering::SeqCst);
    }
    fn on_resumed(&self) {
        self.resumed.fetch_add(1, Ordering::SeqCst);
    }
    fn name(&self) -> &'static str {
        "counter"
    }
}

struct Tagged {
    tag: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl SuspendListener for Tagged {
    fn on_suspended(&self) {
        self.log.lock().unwrap().push(self.tag);
    }
    fn on_resumed(&self) {}
    fn name(&self) -> &'static str {
        self.tag
    }
}

fn barrier_with_counter() -> (Arc<DependencyBarrier>, Arc<Counter>) {
    let b = Arc::new(DependencyBarrier::new(IsolateId(2), Bus::new(256)));
    let c = Arc::new(Counter::default());
    b.add_listener(c.clone());
    (b, c)
}

#[test]
fn scenario_a_two_tokens_released_in_turn() {
    let (b, c) = barrier_with_counter();
    let d1 = Dependency::new("d1");
    let d2 = Dependency::new("d2");
    b.add_dependency(&d1);
    b.add_dependency(&d2);

    b.request_suspend().unwrap();
    assert_eq!(b.state(), CoordinationState::Suspending);
    assert_eq!(c.suspended.load(Ordering::SeqCst), 0);

    b.remove_dependency(&d1);
    assert_eq!(b.state(), CoordinationState::Suspending);
    assert_eq!(c.suspended.load(Ordering::SeqCst), 0);

    b.remove_dependency(&d2);
    assert_eq!(b.state(), CoordinationState::Suspended);
    assert_eq!(c.suspended.load(Ordering::SeqCst), 1);
}

#[test]
fn duplicate_add_needs_single_remove() {
    let (b, c) = barrier_with_counter();
    let t = Dependency::new("t");
    b.add_dependency(&t);
    b.add_dependency(&t);
    assert_eq!(b.outstanding().len(), 1);

    b.request_suspend().unwrap();
    b.remove_dependency(&t);
    assert!(b.outstanding().is_empty());
    assert_eq!(b.state(), CoordinationState::Suspended);
    assert_eq!(c.suspended.load(Ordering::SeqCst), 1);
}

#[test]
fn empty_suspend_notifies_before_returning() {
    let (b, c) = barrier_with_counter();
    b.request_suspend().unwrap();
    assert_eq!(b.state(), CoordinationState::Suspended);
    assert_eq!(c.suspended.load(Ordering::SeqCst), 1);
}

#[test]
fn listeners_hear_newest_first() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let b = DependencyBarrier::new(IsolateId(2), Bus::new(16));
    for tag in ["o1", "o2", "o3"] {
        b.add_listener(Arc::new(Tagged {
            tag,
            log: Arc::clone(&log),
        }));
    }

    b.request_suspend().unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["o3", "o2", "o1"]);
}

struct Faulty;

impl SuspendListener for Faulty {
    fn on_suspended(&self) {
        panic!("display driver gone");
    }
    fn on_resumed(&self) {
        panic!("display driver gone");
    }
    fn name(&self) -> &'static str {
        "faulty"
    }
}

#[test]
fn faulty_listener_does_not_stop_fan_out() {
    let bus = Bus::new(64);
    let mut rx = bus.subscribe();
    let b = DependencyBarrier::new(IsolateId(2), bus);
    let c = Arc::new(Counter::default());
    b.add_listener(c.clone());
    b.add_listener(Arc::new(Faulty));

    b.request_suspend().unwrap();
    b.request_resume().unwrap();

    assert_eq!(c.suspended.load(Ordering::SeqCst), 1);
    assert_eq!(c.resumed.load(Ordering::SeqCst), 1);

    let mut panics = 0;
    while let Ok(ev) = rx.try_recv() {
        if ev.kind == EventKind::ListenerPanicked {
            assert_eq!(ev.subject.as_deref(), Some("faulty"));
            panics += 1;
        }
    }
    assert_eq!(panics, 2);
}

#[test]
fn racing_release_of_last_two_tokens_finalizes_once() {
    for _ in 0..200 {
        let (b, c) = barrier_with_counter();
        let d1 = Dependency::new("d1");
        let d2 = Dependency::new("d2");
        b.add_dependency(&d1);
        b.add_dependency(&d2);
        b.request_suspend().unwrap();

        let start = Arc::new(Barrier::new(2));
        let handles: Vec<_> = [d1, d2]
            .into_iter()
            .map(|dep| {
                let b = Arc::clone(&b);
                let start = Arc::clone(&start);
                thread::spawn(move || {
                    start.wait();
                    b.remove_dependency(&dep);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(b.state(), CoordinationState::Suspended);
        assert_eq!(c.suspended.load(Ordering::SeqCst), 1);
    }
}

#[test]
fn release_racing_suspend_request_finalizes_once() {
    for _ in 0..200 {
        let (b, c) = barrier_with_counter();
        let deps: Vec<Dependency> = (0..8).map(|i| Dependency::new(format!("d{i}"))).collect();
        for d in &deps {
            b.add_dependency(d);
        }

        let start = Arc::new(Barrier::new(deps.len() + 1));
        let mut handles = Vec::new();
        for dep in deps {
            let b = Arc::clone(&b);
            let start = Arc::clone(&start);
            handles.push(thread::spawn(move || {
                start.wait();
                b.remove_dependency(&dep);
            }));
        }
        {
            let b = Arc::clone(&b);
            let start = Arc::clone(&start);
            handles.push(thread::spawn(move || {
                start.wait();
                b.request_suspend().unwrap();
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(b.state(), CoordinationState::Suspended);
        assert_eq!(c.suspended.load(Ordering::SeqCst), 1);
    }
}

struct ResumeOrder(Arc<Mutex<Vec<&'static str>>>);

impl SuspendListener for ResumeOrder {
    fn on_suspended(&self) {
        thread::sleep(std::time::Duration::from_millis(5));
        self.0.lock().unwrap().push("suspended");
    }
    fn on_resumed(&self) {
        self.0.lock().unwrap().push("resumed");
    }
}

#[test]
fn resume_never_overtakes_suspend_notification() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let b = Arc::new(DependencyBarrier::new(IsolateId(2), Bus::new(16)));
    b.add_listener(Arc::new(ResumeOrder(Arc::clone(&log))));

    let dep = Dependency::new("slow");
    b.add_dependency(&dep);
    b.request_suspend().unwrap();

    let releaser = {
        let b = Arc::clone(&b);
        thread::spawn(move || b.remove_dependency(&dep))
    };
    while b.state() != CoordinationState::Suspended {
        thread::yield_now();
    }
    b.request_resume().unwrap();
    releaser.join().unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["suspended", "resumed"]);
}

#[test]
fn repeated_cycles_each_finalize_once() {
    let (b, c) = barrier_with_counter();
    for cycle in 1..=3 {
        let dep = Dependency::new("per-cycle");
        b.add_dependency(&dep);
        b.request_suspend().unwrap();
        b.remove_dependency(&dep);
        b.request_resume().unwrap();
        assert_eq!(b.cycle(), cycle);
        assert_eq!(c.suspended.load(Ordering::SeqCst), cycle as usize);
        assert_eq!(c.resumed.load(Ordering::SeqCst), cycle as usize);
    }
}

struct Registering {
    barrier: Arc<DependencyBarrier>,
    added: Arc<Counter>,
}

impl SuspendListener for Registering {
    fn on_suspended(&self) {
        self.barrier.add_listener(self.added.clone());
    }
    fn on_resumed(&self) {}
}

#[test]
fn listener_may_register_during_fan_out() {
    let b = Arc::new(DependencyBarrier::new(IsolateId(2), Bus::new(16)));
    let late = Arc::new(Counter::default());
    b.add_listener(Arc::new(Registering {
        barrier: Arc::clone(&b),
        added: Arc::clone(&late),
    }));

    b.request_suspend().unwrap();
    assert_eq!(late.suspended.load(Ordering::SeqCst), 0);
    assert_eq!(b.listener_count(), 2);

    b.request_resume().unwrap();
    assert_eq!(late.resumed.load(Ordering::SeqCst), 1);
}

/// Starts the next suspend from inside its first `on_resumed`.
struct Bouncer {
    barrier: std::sync::OnceLock<Arc<DependencyBarrier>>,
    log: Arc<Mutex<Vec<&'static str>>>,
    resuspend: std::sync::atomic::AtomicBool,
}

impl SuspendListener for Bouncer {
    fn on_suspended(&self) {
        self.log.lock().unwrap().push("suspended");
    }
    fn on_resumed(&self) {
        self.log.lock().unwrap().push("resumed");
        if self.resuspend.swap(false, Ordering::SeqCst) {
            let b = self.barrier.get().unwrap();
            b.request_suspend().unwrap();
            self.log.lock().unwrap().push("nested-returned");
        }
    }
}

#[test]
fn transition_requested_from_callback_is_delivered_after_current_round() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let b = Arc::new(DependencyBarrier::new(IsolateId(2), Bus::new(64)));
    let bouncer = Arc::new(Bouncer {
        barrier: std::sync::OnceLock::new(),
        log: Arc::clone(&log),
        resuspend: std::sync::atomic::AtomicBool::new(true),
    });
    let _ = bouncer.barrier.set(Arc::clone(&b));
    b.add_listener(bouncer.clone());

    b.request_suspend().unwrap();

    let (done_tx, done_rx) = std::sync::mpsc::channel();
    {
        let b = Arc::clone(&b);
        thread::spawn(move || {
            let res = b.request_resume();
            let _ = done_tx.send(res);
        });
    }
    let res = done_rx
        .recv_timeout(std::time::Duration::from_secs(2))
        .expect("resume must not hang when a listener re-enters");
    res.unwrap();

    assert_eq!(b.state(), CoordinationState::Suspended);
    assert_eq!(b.cycle(), 2);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["suspended", "resumed", "nested-returned", "suspended"]
    );

    // the barrier keeps working afterwards
    b.request_resume().unwrap();
    assert_eq!(b.state(), CoordinationState::Active);
    assert_eq!(log.lock().unwrap().last(), Some(&"resumed"));
}

struct ResumeOnSuspend {
    barrier: Arc<DependencyBarrier>,
    counter: Arc<Counter>,
    /// State and resumed count observed right after the nested request.
    seen: Mutex<Option<(CoordinationState, usize)>>,
}

impl SuspendListener for ResumeOnSuspend {
    fn on_suspended(&self) {
        self.barrier.request_resume().unwrap();
        *self.seen.lock().unwrap() = Some((
            self.barrier.state(),
            self.counter.resumed.load(Ordering::SeqCst),
        ));
    }
    fn on_resumed(&self) {}
}

#[test]
fn resume_from_suspended_callback_reaches_every_listener() {
    let b = Arc::new(DependencyBarrier::new(IsolateId(2), Bus::new(64)));
    let c = Arc::new(Counter::default());
    b.add_listener(c.clone());
    let bouncer = Arc::new(ResumeOnSuspend {
        barrier: Arc::clone(&b),
        counter: Arc::clone(&c),
        seen: Mutex::new(None),
    });
    b.add_listener(bouncer.clone());

    b.request_suspend().unwrap();

    // state flipped at once, the resumed round waited for the suspended one
    assert_eq!(
        *bouncer.seen.lock().unwrap(),
        Some((CoordinationState::Active, 0))
    );
    assert_eq!(b.state(), CoordinationState::Active);
    assert_eq!(c.suspended.load(Ordering::SeqCst), 1);
    assert_eq!(c.resumed.load(Ordering::SeqCst), 1);
}
