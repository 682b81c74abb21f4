//! Administrative coordination for the whole runtime.
//!
//! Only the administrative isolate builds an [`AdminCoordinator`]; every other
//! isolate uses a plain [`DependencyBarrier`](crate::DependencyBarrier).
//!
//! - [`apps`]: application identity and the [`RegistryListener`] callbacks;
//! - [`native`]: [`NativeSuspend`] boundary and the one-shot [`KillLatch`];
//! - [`alert`]: [`AlertPresenter`] and fire-and-forget dispatch;
//! - [`coordinator`]: the delegation wrapper and its policy hooks.

pub mod alert;
pub mod apps;
pub mod coordinator;
pub mod native;

pub use alert::{Alert, AlertPresenter, AlertText, LogPresenter};
pub use apps::{AppId, AppRef, RegistryListener};
pub use coordinator::AdminCoordinator;
pub use native::{InProcessNative, KillLatch, NativeSuspend};
