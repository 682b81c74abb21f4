//! Application identity and registry callbacks.
//!
//! The application registry is external; it reports lifecycle changes through
//! [`RegistryListener`] on arbitrary threads, at most once per event. Pause and
//! removal events for an application always follow its `application_added`.

use std::fmt;

use crate::isolate::IsolateId;

/// Identity of a running application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppId(pub u64);

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "app:{}", self.0)
    }
}

/// An application together with the isolate that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppRef {
    pub id: AppId,
    pub isolate: IsolateId,
}

impl AppRef {
    pub fn new(id: u64, isolate: IsolateId) -> Self {
        Self {
            id: AppId(id),
            isolate,
        }
    }
}

/// Lifecycle callbacks delivered by the application registry.
pub trait RegistryListener: Send + Sync {
    /// The application started.
    fn application_added(&self, app: &AppRef);

    /// The application acknowledged a suspend by releasing its resources.
    fn application_paused(&self, app: &AppRef);

    /// The application terminated (user action or the suspend routine itself).
    fn application_removed(&self, app: &AppRef);
}
