//! # Suspend dependency tokens.
//!
//! A [`Dependency`] is an opaque handle whose presence in a barrier's set
//! postpones the `Suspending → Suspended` transition. Identity is generated,
//! not derived from the label: two tokens created with the same label are
//! distinct, while clones of one token are the same dependency.
//!
//! ## Example
//! ```rust
//! use quiesce::Dependency;
//!
//! let a = Dependency::new("flush-cache");
//! let b = Dependency::new("flush-cache");
//! assert_ne!(a, b);
//! assert_eq!(a, a.clone());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Global counter for token identity.
static DEPENDENCY_SEQ: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`Dependency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DependencyId(u64);

impl DependencyId {
    fn next() -> Self {
        Self(DEPENDENCY_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw numeric value.
    #[inline]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DependencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle representing "some party needs more time before the barrier closes".
///
/// Owned by whoever registers it; the barrier only records membership.
#[derive(Clone)]
pub struct Dependency {
    id: DependencyId,
    label: Arc<str>,
}

impl Dependency {
    /// Creates a token with a fresh identity. The label is for diagnostics only.
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        Self {
            id: DependencyId::next(),
            label: label.into(),
        }
    }

    #[inline]
    pub fn id(&self) -> DependencyId {
        self.id
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Dependency {}

impl std::hash::Hash for Dependency {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependency")
            .field("id", &self.id)
            .field("label", &&*self.label)
            .finish()
    }
}

/// Set of outstanding dependencies keyed by identity.
///
/// Lives inside the barrier's state lock; hooks receive it mutably during
/// suspend-begin to re-arm their own tokens.
#[derive(Debug, Default)]
pub struct DependencySet {
    deps: HashMap<DependencyId, Arc<str>>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `dep`; returns `false` if it was already present.
    pub fn insert(&mut self, dep: &Dependency) -> bool {
        if self.deps.contains_key(&dep.id) {
            return false;
        }
        self.deps.insert(dep.id, Arc::clone(&dep.label));
        true
    }

    /// Removes `dep`; returns `false` if it was not present.
    pub fn remove(&mut self, dep: &Dependency) -> bool {
        self.deps.remove(&dep.id).is_some()
    }

    pub fn contains(&self, dep: &Dependency) -> bool {
        self.deps.contains_key(&dep.id)
    }

    pub fn len(&self) -> usize {
        self.deps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deps.is_empty()
    }

    /// Sorted `label#id` strings of the members.
    pub fn labels(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .deps
            .iter()
            .map(|(id, label)| format!("{label}{id}"))
            .collect();
        out.sort_unstable();
        out
    }
}
