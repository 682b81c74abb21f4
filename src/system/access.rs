//! Capability gate in front of the process-wide instance.
//!
//! The check is a pass-through: it authorizes the caller and takes no part
//! in coordination.

use std::collections::HashSet;

use crate::error::AccessError;

/// Capabilities a caller may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    /// Access to runtime-internal services such as the suspend system.
    Runtime,
    /// Ordinary application privileges.
    Application,
}

/// Set of permissions presented by a caller.
#[derive(Debug, Clone, Default)]
pub struct SecurityToken {
    granted: HashSet<Permission>,
}

impl SecurityToken {
    pub fn new(granted: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            granted: granted.into_iter().collect(),
        }
    }

    /// Token for runtime-internal code.
    pub fn runtime() -> Self {
        Self::new([Permission::Runtime, Permission::Application])
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.granted.contains(&permission)
    }

    /// Fails with [`AccessError::PermissionDenied`] unless `permission` was granted.
    pub fn check(&self, permission: Permission) -> Result<(), AccessError> {
        if self.allows(permission) {
            Ok(())
        } else {
            Err(AccessError::PermissionDenied { permission })
        }
    }
}
