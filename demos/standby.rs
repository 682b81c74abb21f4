//! # Example: standby
//!
//! Simulates two standby cycles of the administrative isolate.
//!
//! Shows how to:
//! - Build the [`SuspendSystem`] for the administrative isolate.
//! - Hold the barrier with a [`Dependency`] from a background worker.
//! - Drive the registry callbacks of the [`AdminCoordinator`](quiesce::AdminCoordinator).
//! - Observe every transition through the [`LogWriter`] subscriber.
//!
//! ## Flow
//! ```text
//! cycle 1: app:1 pauses, app:2 is killed ─► outcome=false ─► resume, no alert
//! cycle 2: app:1 is killed               ─► outcome=true  ─► resume, warning alert
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example standby --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use quiesce::{
    AppRef, Config, Dependency, IsolateId, LogWriter, RegistryListener, Subscribe, SuspendListener,
    SuspendSystem,
};
use tracing_subscriber::EnvFilter;

struct Display;

impl SuspendListener for Display {
    fn on_suspended(&self) {
        println!("[display] backlight off");
    }
    fn on_resumed(&self) {
        println!("[display] backlight on");
    }
    fn name(&self) -> &'static str {
        "display"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cfg = Config {
        suspend_grace: Duration::from_secs(2),
        ..Config::default()
    };
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let system = SuspendSystem::builder(cfg.clone(), cfg.admin_isolate)
        .with_subscribers(subs)
        .build()?;

    let coord = Arc::clone(system.coordinator());
    let admin = Arc::clone(system.admin().ok_or("not the administrative isolate")?);
    coord.add_listener(Arc::new(Display));

    let mail = AppRef::new(1, IsolateId(2));
    let music = AppRef::new(2, IsolateId(3));
    admin.application_added(&mail);
    admin.application_added(&music);

    // cycle 1: a storage flush holds the barrier for a moment
    let flush = Dependency::new("storage-flush");
    coord.add_dependency(&flush);
    {
        let coord = Arc::clone(&coord);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            coord.remove_dependency(&flush);
        });
    }
    coord.request_suspend()?;
    admin.application_paused(&mail);
    admin.application_removed(&music);
    coord.wait_suspended(cfg.grace()).await?;
    println!("[driver] cycle 1 suspended; resuming");
    coord.request_resume()?;

    // cycle 2: the only remaining app is killed
    coord.request_suspend()?;
    admin.application_removed(&mail);
    coord.wait_suspended(cfg.grace()).await?;
    println!("[driver] cycle 2 suspended; resuming");
    coord.request_resume()?;

    tokio::time::sleep(Duration::from_millis(100)).await;
    Ok(())
}
