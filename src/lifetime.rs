//! Binding lifetime definitions.

/// Binding lifetimes controlling instance caching behavior
///
/// Applies to bindings whose provider constructs values (`supplier`, `to`).
/// Bindings declared from an existing value are always shared.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{ApplicationContext, Lifetime, Resolver};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// let context = ApplicationContext::new();
/// let counter = Arc::new(AtomicU32::new(0));
/// let c = counter.clone();
///
/// context.bind::<u32>()
///     .lifetime(Lifetime::Singleton)
///     .supplier(move || Ok(Arc::new(c.fetch_add(1, Ordering::SeqCst))));
///
/// let first = context.get_typed::<u32>().unwrap();
/// let second = context.get_typed::<u32>().unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(counter.load(Ordering::SeqCst), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifetime {
    /// Produced once on first request and cached by the binding
    ///
    /// The provider is wrapped in a
    /// [`SingletonProvider`](crate::provider::SingletonProvider); every
    /// resolution through the hierarchy returns the same instance.
    Singleton,
    /// New instance per resolution, never cached
    ///
    /// The provider is invoked every time the binding is resolved.
    #[default]
    Prototype,
}
