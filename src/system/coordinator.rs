//! The capability set shared by both coordinator variants.
//!
//! Drivers hold an `Arc<dyn Coordinator>` and never need to know whether they
//! talk to a plain [`DependencyBarrier`] or the [`AdminCoordinator`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::admin::AdminCoordinator;
use crate::barrier::{CoordinationState, Dependency, DependencyBarrier, SuspendListener};
use crate::error::CoordinatorError;
use crate::isolate::IsolateId;

/// Suspend/resume coordinator of one isolate.
#[async_trait]
pub trait Coordinator: Send + Sync + 'static {
    fn isolate(&self) -> IsolateId;

    fn state(&self) -> CoordinationState;

    /// `Active → Suspending`, closing at once if nothing is outstanding.
    fn request_suspend(&self) -> Result<(), CoordinatorError>;

    /// `Suspended → Active`, notifying listeners.
    fn request_resume(&self) -> Result<(), CoordinatorError>;

    fn add_listener(&self, listener: Arc<dyn SuspendListener>);

    fn add_dependency(&self, dep: &Dependency);

    fn remove_dependency(&self, dep: &Dependency);

    /// Labels of dependencies still holding the barrier.
    fn outstanding(&self) -> Vec<String>;

    /// Waits until the most recently started cycle reached `Suspended`.
    async fn wait_suspended(&self, grace: Option<Duration>) -> Result<(), CoordinatorError>;

    /// The administrative view, if this is the administrative isolate.
    fn as_admin(&self) -> Option<&AdminCoordinator> {
        None
    }
}

#[async_trait]
impl Coordinator for DependencyBarrier {
    fn isolate(&self) -> IsolateId {
        DependencyBarrier::isolate(self)
    }

    fn state(&self) -> CoordinationState {
        DependencyBarrier::state(self)
    }

    fn request_suspend(&self) -> Result<(), CoordinatorError> {
        DependencyBarrier::request_suspend(self)
    }

    fn request_resume(&self) -> Result<(), CoordinatorError> {
        DependencyBarrier::request_resume(self)
    }

    fn add_listener(&self, listener: Arc<dyn SuspendListener>) {
        DependencyBarrier::add_listener(self, listener)
    }

    fn add_dependency(&self, dep: &Dependency) {
        DependencyBarrier::add_dependency(self, dep)
    }

    fn remove_dependency(&self, dep: &Dependency) {
        DependencyBarrier::remove_dependency(self, dep)
    }

    fn outstanding(&self) -> Vec<String> {
        DependencyBarrier::outstanding(self)
    }

    async fn wait_suspended(&self, grace: Option<Duration>) -> Result<(), CoordinatorError> {
        DependencyBarrier::wait_suspended(self, grace).await
    }
}

#[async_trait]
impl Coordinator for AdminCoordinator {
    fn isolate(&self) -> IsolateId {
        self.barrier().isolate()
    }

    fn state(&self) -> CoordinationState {
        self.barrier().state()
    }

    fn request_suspend(&self) -> Result<(), CoordinatorError> {
        self.barrier().request_suspend()
    }

    fn request_resume(&self) -> Result<(), CoordinatorError> {
        self.barrier().request_resume()
    }

    fn add_listener(&self, listener: Arc<dyn SuspendListener>) {
        self.barrier().add_listener(listener)
    }

    fn add_dependency(&self, dep: &Dependency) {
        self.barrier().add_dependency(dep)
    }

    fn remove_dependency(&self, dep: &Dependency) {
        self.barrier().remove_dependency(dep)
    }

    fn outstanding(&self) -> Vec<String> {
        self.barrier().outstanding()
    }

    async fn wait_suspended(&self, grace: Option<Duration>) -> Result<(), CoordinatorError> {
        self.barrier().wait_suspended(grace).await
    }

    fn as_admin(&self) -> Option<&AdminCoordinator> {
        Some(self)
    }
}
