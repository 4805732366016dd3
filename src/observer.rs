//! Diagnostic observers for resolution and population events.
//!
//! Observers are registered on the [`ApplicationBuilder`](crate::ApplicationBuilder)
//! and called synchronously from the resolving thread, so implementations
//! should stay cheap. [`LoggingObserver`] forwards every event to `tracing`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::error::DiError;
use crate::key::{ComponentKey, TypeKey};

/// Observer trait for resolution and population events.
///
/// # Examples
///
/// ```
/// use ferrous_inject::{ApplicationContext, ComponentKey, DiError, ResolutionObserver, Resolver};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Counting {
///     resolved: AtomicUsize,
/// }
///
/// impl ResolutionObserver for Counting {
///     fn resolving(&self, _key: &ComponentKey) {}
///
///     fn resolved(&self, _key: &ComponentKey, _duration: Duration) {
///         self.resolved.fetch_add(1, Ordering::SeqCst);
///     }
///
///     fn resolution_failed(&self, _key: &ComponentKey, _error: &DiError) {}
/// }
///
/// let observer = Arc::new(Counting::default());
/// let context = ApplicationContext::builder()
///     .observer(observer.clone())
///     .build();
/// context.bind::<u8>().singleton(7);
///
/// context.get_typed::<u8>().unwrap();
/// assert_eq!(observer.resolved.load(Ordering::SeqCst), 1);
/// ```
pub trait ResolutionObserver: Send + Sync {
    /// Called before the hierarchy for `key` is consulted.
    fn resolving(&self, key: &ComponentKey);

    /// Called when `key` resolved successfully.
    fn resolved(&self, key: &ComponentKey, duration: Duration);

    /// Called when resolving `key` failed; the error still propagates.
    fn resolution_failed(&self, key: &ComponentKey, error: &DiError);

    /// Called after a component of type `component` was populated.
    fn populated(&self, component: TypeKey, duration: Duration) {
        let _ = (component, duration);
    }
}

/// Container for registered observers.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ResolutionObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn ResolutionObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &ComponentKey) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &ComponentKey, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn resolution_failed(&self, key: &ComponentKey, error: &DiError) {
        for observer in &self.observers {
            observer.resolution_failed(key, error);
        }
    }

    #[inline]
    pub(crate) fn populated(&self, component: TypeKey, duration: Duration) {
        for observer in &self.observers {
            observer.populated(component, duration);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// Resolution events are emitted at TRACE, population at DEBUG and failures
/// at WARN, all under the `ferrous_inject` target with the configured prefix
/// as a field.
///
/// ```
/// use ferrous_inject::{ApplicationContext, LoggingObserver};
/// use std::sync::Arc;
///
/// let context = ApplicationContext::builder()
///     .observer(Arc::new(LoggingObserver::new()))
///     .build();
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "ferrous-inject".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionObserver for LoggingObserver {
    fn resolving(&self, key: &ComponentKey) {
        trace!(target: "ferrous_inject", prefix = %self.prefix, %key, "Resolving");
    }

    fn resolved(&self, key: &ComponentKey, duration: Duration) {
        trace!(target: "ferrous_inject", prefix = %self.prefix, %key, ?duration, "Resolved");
    }

    fn resolution_failed(&self, key: &ComponentKey, error: &DiError) {
        warn!(target: "ferrous_inject", prefix = %self.prefix, %key, %error, "Resolution failed");
    }

    fn populated(&self, component: TypeKey, duration: Duration) {
        debug!(target: "ferrous_inject", prefix = %self.prefix, %component, ?duration, "Populated");
    }
}
