//! Binding hierarchies: per-key, priority-ordered provider registries.
//!
//! A [`BindingHierarchy`] maps integer priorities to providers for one
//! contract key. Iteration is strictly descending by priority, so the first
//! provider seen is the one resolution invokes.
//!
//! The provider map is held behind an [`ArcSwap`] and replaced wholesale on
//! every structural change. Readers always iterate a complete snapshot, and
//! concurrent writers to the same slot leave the map consistent with the last
//! write winning.
//!
//! # Examples
//!
//! ```rust
//! use ferrous_inject::{BindingHierarchy, ComponentKey, InstanceProvider, Provider};
//! use std::sync::Arc;
//!
//! let hierarchy = BindingHierarchy::new(ComponentKey::of::<u32>().view());
//! let low: Arc<dyn Provider> = Arc::new(InstanceProvider::new(Arc::new(1u32)));
//! let high: Arc<dyn Provider> = Arc::new(InstanceProvider::new(Arc::new(2u32)));
//!
//! hierarchy.add_at(0, low).add_at(5, high.clone());
//! assert_eq!(hierarchy.priorities(), vec![5, 0]);
//! assert!(Arc::ptr_eq(&hierarchy.providers()[0], &high));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::warn;

use crate::key::ComponentKeyView;
use crate::provider::Provider;

mod binder;

pub use binder::Binder;

/// Priority of the default slot.
pub const DEFAULT_PRIORITY: i32 = -1;

type Bindings = BTreeMap<i32, Arc<dyn Provider>>;

/// Ordered collection of (priority, provider) entries for one contract key.
pub struct BindingHierarchy {
    key: ComponentKeyView,
    bindings: ArcSwap<Bindings>,
}

impl BindingHierarchy {
    pub fn new(key: ComponentKeyView) -> Self {
        Self {
            key,
            bindings: ArcSwap::from_pointee(Bindings::new()),
        }
    }

    pub fn key(&self) -> &ComponentKeyView {
        &self.key
    }

    /// Inserts into the default slot, replacing any previous default silently.
    pub fn add(&self, provider: Arc<dyn Provider>) -> &Self {
        self.add_at(DEFAULT_PRIORITY, provider)
    }

    /// Inserts at an explicit priority.
    ///
    /// Replacing an occupied slot other than the default one is allowed but
    /// logged as a warning.
    pub fn add_at(&self, priority: i32, provider: Arc<dyn Provider>) -> &Self {
        let previous = self.bindings.rcu(|current| {
            let mut next = Bindings::clone(current);
            next.insert(priority, provider.clone());
            next
        });
        if priority != DEFAULT_PRIORITY && previous.contains_key(&priority) {
            warn!(
                key = %self.key,
                priority,
                "Binding overwritten; a provider was already registered at this priority"
            );
        }
        self
    }

    /// Inserts one above the current highest priority, or into the default
    /// slot when empty. Returns the priority used.
    pub fn add_next(&self, provider: Arc<dyn Provider>) -> i32 {
        let mut chosen = DEFAULT_PRIORITY;
        self.bindings.rcu(|current| {
            chosen = next_priority(current);
            let mut next = Bindings::clone(current);
            next.insert(chosen, provider.clone());
            next
        });
        chosen
    }

    /// Returns a new hierarchy holding the entries of both.
    ///
    /// Entries of `other` are copied first, then entries of `self` with the
    /// usual overwrite rules, so `self` wins every priority collision.
    pub fn merge(&self, other: &BindingHierarchy) -> BindingHierarchy {
        let merged = BindingHierarchy::new(self.key.clone());
        for (priority, provider) in other.snapshot().iter() {
            merged.add_at(*priority, provider.clone());
        }
        for (priority, provider) in self.snapshot().iter() {
            merged.add_at(*priority, provider.clone());
        }
        merged
    }

    /// Copies the entries of `other` into this hierarchy in a single swap.
    ///
    /// Entries of `other` win priority collisions. Handles to `self` stay
    /// live and see the result.
    pub fn absorb(&self, other: &BindingHierarchy) -> &Self {
        let incoming = other.snapshot();
        let previous = self.bindings.rcu(|current| {
            let mut next = Bindings::clone(current);
            next.extend(incoming.iter().map(|(p, provider)| (*p, provider.clone())));
            next
        });
        for priority in incoming.keys() {
            if *priority != DEFAULT_PRIORITY && previous.contains_key(priority) {
                warn!(
                    key = %self.key,
                    priority,
                    "Binding overwritten; a provider was already registered at this priority"
                );
            }
        }
        self
    }

    /// Providers ordered by descending priority.
    pub fn providers(&self) -> Vec<Arc<dyn Provider>> {
        self.snapshot().values().rev().cloned().collect()
    }

    /// (priority, provider) pairs ordered by descending priority.
    pub fn entries(&self) -> Vec<(i32, Arc<dyn Provider>)> {
        self.snapshot()
            .iter()
            .rev()
            .map(|(priority, provider)| (*priority, provider.clone()))
            .collect()
    }

    pub fn priorities(&self) -> Vec<i32> {
        self.snapshot().keys().rev().copied().collect()
    }

    pub fn get(&self, priority: i32) -> Option<Arc<dyn Provider>> {
        self.snapshot().get(&priority).cloned()
    }

    pub fn highest_priority(&self) -> Option<i32> {
        self.snapshot().keys().next_back().copied()
    }

    /// The provider resolution invokes.
    pub fn highest(&self) -> Option<Arc<dyn Provider>> {
        self.snapshot().values().next_back().cloned()
    }

    /// Number of distinct priorities.
    pub fn size(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Consistent view of the current entries.
    pub fn snapshot(&self) -> Arc<BTreeMap<i32, Arc<dyn Provider>>> {
        self.bindings.load_full()
    }
}

fn next_priority(bindings: &Bindings) -> i32 {
    bindings
        .keys()
        .next_back()
        .map_or(DEFAULT_PRIORITY, |max| max.saturating_add(1))
}

impl Clone for BindingHierarchy {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            bindings: ArcSwap::new(self.snapshot()),
        }
    }
}

/// Same key and the same provider (by identity) at every priority.
impl PartialEq for BindingHierarchy {
    fn eq(&self, other: &Self) -> bool {
        let (ours, theirs) = (self.snapshot(), other.snapshot());
        self.key == other.key
            && ours.len() == theirs.len()
            && ours
                .iter()
                .zip(theirs.iter())
                .all(|((p, a), (q, b))| p == q && Arc::ptr_eq(a, b))
    }
}

impl fmt::Debug for BindingHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries();
        f.debug_struct("BindingHierarchy")
            .field("key", &self.key)
            .field(
                "bindings",
                &entries
                    .iter()
                    .map(|(priority, provider)| (*priority, provider.kind()))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl fmt::Display for BindingHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.key)?;
        for (i, (priority, provider)) in self.entries().iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {priority}: {}", provider.kind())?;
        }
        write!(f, " }}")
    }
}
