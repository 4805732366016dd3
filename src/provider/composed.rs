//! Providers wrapping other providers.

use std::sync::Arc;

#[cfg(feature = "once-cell")]
use once_cell::sync::OnceCell;
#[cfg(not(feature = "once-cell"))]
use parking_lot::Mutex;

use crate::application::ApplicationContext;
use crate::error::DiResult;
use crate::instance::Instance;
use crate::provider::{Provider, ProviderKind};

type ComposeFn = Arc<dyn Fn(&ApplicationContext, Instance) -> DiResult<Instance> + Send + Sync>;

/// Post-processes the values of another provider.
///
/// ```rust
/// use ferrous_inject::{
///     unwrap_provider, ApplicationContext, ComposedProvider, Instance, Provider,
///     ProviderKind, Resolver, SupplierProvider,
/// };
/// use std::sync::Arc;
///
/// let inner: Arc<dyn Provider> = Arc::new(SupplierProvider::new(|| Ok(Arc::new(20u32))));
/// let doubled = ComposedProvider::new(inner, |_, instance| {
///     let value = instance.try_downcast::<u32>()?;
///     Ok(Instance::of(*value * 2))
/// });
///
/// let context = ApplicationContext::new();
/// let doubled: Arc<dyn Provider> = Arc::new(doubled);
/// context.bind::<u32>().provider(doubled.clone());
///
/// assert_eq!(*context.get_typed::<u32>().unwrap(), 40);
/// assert_eq!(unwrap_provider(&doubled).kind(), ProviderKind::Supplier);
/// ```
pub struct ComposedProvider {
    inner: Arc<dyn Provider>,
    compose: ComposeFn,
}

impl ComposedProvider {
    pub fn new<F>(inner: Arc<dyn Provider>, compose: F) -> Self
    where
        F: Fn(&ApplicationContext, Instance) -> DiResult<Instance> + Send + Sync + 'static,
    {
        Self {
            inner,
            compose: Arc::new(compose),
        }
    }
}

impl Provider for ComposedProvider {
    fn provide(&self, context: &ApplicationContext) -> DiResult<Option<Instance>> {
        match self.inner.provide(context)? {
            Some(instance) => (self.compose)(context, instance).map(Some),
            None => Ok(None),
        }
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Composed
    }

    fn composed_inner(&self) -> Option<&Arc<dyn Provider>> {
        Some(&self.inner)
    }
}

/// Caches the first value another provider produces.
///
/// Construction runs outside the cache lock, so a factory that resolves
/// other singletons never blocks on this one. When two threads race on the
/// first request, the value stored first is the one every caller sees.
pub struct SingletonProvider {
    inner: Arc<dyn Provider>,
    #[cfg(feature = "once-cell")]
    cache: OnceCell<Instance>,
    #[cfg(not(feature = "once-cell"))]
    cache: Mutex<Option<Instance>>,
}

impl SingletonProvider {
    pub fn new(inner: Arc<dyn Provider>) -> Self {
        Self {
            inner,
            #[cfg(feature = "once-cell")]
            cache: OnceCell::new(),
            #[cfg(not(feature = "once-cell"))]
            cache: Mutex::new(None),
        }
    }

    /// The cached value, if one was produced.
    pub fn cached(&self) -> Option<Instance> {
        #[cfg(feature = "once-cell")]
        {
            self.cache.get().cloned()
        }
        #[cfg(not(feature = "once-cell"))]
        {
            self.cache.lock().clone()
        }
    }

    fn store(&self, instance: Instance) -> Instance {
        #[cfg(feature = "once-cell")]
        {
            self.cache.get_or_init(|| instance).clone()
        }
        #[cfg(not(feature = "once-cell"))]
        {
            self.cache.lock().get_or_insert(instance).clone()
        }
    }
}

impl Provider for SingletonProvider {
    fn provide(&self, context: &ApplicationContext) -> DiResult<Option<Instance>> {
        if let Some(instance) = self.cached() {
            return Ok(Some(instance));
        }
        Ok(self.inner.provide(context)?.map(|instance| self.store(instance)))
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Singleton
    }

    fn composed_inner(&self) -> Option<&Arc<dyn Provider>> {
        Some(&self.inner)
    }
}
