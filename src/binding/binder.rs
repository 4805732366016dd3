//! Fluent binding declarations.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::application::ApplicationContext;
use crate::binding::BindingHierarchy;
use crate::error::{BoxError, DiResult};
use crate::instance::Instance;
use crate::key::{ComponentKey, ComponentKeyBuilder};
use crate::lifetime::Lifetime;
use crate::provider::{
    ComposedProvider, ContextDrivenProvider, FactoryProvider, InstanceProvider, Provider,
    SingletonProvider, SupplierProvider,
};
use crate::qualifier::QualifierKey;

/// Declares a binding for contract `T`.
///
/// Qualifiers, priority and lifetime are set first; a terminal method then
/// registers the provider in the key's hierarchy and returns it. Without a
/// priority the default slot is used.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{ApplicationContext, ComponentKey, Resolver};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String { "hello".into() }
/// }
///
/// let context = ApplicationContext::new();
/// context.bind::<dyn Greeter>().singleton_arc(Arc::new(English));
/// context.bind::<String>().named("greeting").priority(1).singleton("hi".to_string());
///
/// assert_eq!(context.get_typed::<dyn Greeter>().unwrap().greet(), "hello");
/// assert_eq!(*context.get_named::<String>("greeting").unwrap(), "hi");
/// ```
pub struct Binder<'a, T: ?Sized> {
    context: &'a ApplicationContext,
    key: ComponentKeyBuilder,
    priority: Option<i32>,
    lifetime: Lifetime,
    _contract: PhantomData<fn() -> Arc<T>>,
}

impl<'a, T: ?Sized + Send + Sync + 'static> Binder<'a, T> {
    pub(crate) fn new(context: &'a ApplicationContext) -> Self {
        Self {
            context,
            key: ComponentKey::builder::<T>(),
            priority: None,
            lifetime: Lifetime::default(),
            _contract: PhantomData,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.key = self.key.name(name);
        self
    }

    pub fn qualified(mut self, qualifier: QualifierKey) -> Self {
        self.key = self.key.qualifier(qualifier);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Binds an existing value. The value is shared regardless of lifetime.
    pub fn singleton(self, value: T) -> Arc<BindingHierarchy>
    where
        T: Sized,
    {
        self.singleton_arc(Arc::new(value))
    }

    pub fn singleton_arc(self, value: Arc<T>) -> Arc<BindingHierarchy> {
        self.register(Arc::new(InstanceProvider::new(value)))
    }

    /// Binds a zero-argument factory.
    pub fn supplier<F>(self, supplier: F) -> Arc<BindingHierarchy>
    where
        F: Fn() -> Result<Arc<T>, BoxError> + Send + Sync + 'static,
    {
        let provider = self.scoped(Arc::new(SupplierProvider::new(supplier)));
        self.register(provider)
    }

    /// Binds a factory that resolves its own dependencies.
    pub fn factory<F>(self, factory: F) -> Arc<BindingHierarchy>
    where
        F: Fn(&ApplicationContext) -> DiResult<Arc<T>> + Send + Sync + 'static,
    {
        let provider = self.scoped(Arc::new(FactoryProvider::new(factory)));
        self.register(provider)
    }

    /// Binds to implementation `I`, built through its registered type view
    /// and converted with `cast`.
    pub fn to<I>(self, cast: fn(Arc<I>) -> Arc<T>) -> Arc<BindingHierarchy>
    where
        I: Send + Sync + 'static,
    {
        let construct: Arc<dyn Provider> = Arc::new(ContextDrivenProvider::of::<I>());
        let composed = ComposedProvider::new(construct, move |_: &ApplicationContext, instance: Instance| {
            instance.try_downcast::<I>().map(|value| Instance::new(cast(value)))
        });
        let provider = self.scoped(Arc::new(composed));
        self.register(provider)
    }

    /// Binds `T` to its own registered type view.
    pub fn to_self(self) -> Arc<BindingHierarchy>
    where
        T: Sized,
    {
        let provider = self.scoped(Arc::new(ContextDrivenProvider::of::<T>()));
        self.register(provider)
    }

    /// Binds a custom provider, wrapped for caching when the lifetime is
    /// singleton.
    pub fn provider(self, provider: Arc<dyn Provider>) -> Arc<BindingHierarchy> {
        let provider = self.scoped(provider);
        self.register(provider)
    }

    fn scoped(&self, provider: Arc<dyn Provider>) -> Arc<dyn Provider> {
        match self.lifetime {
            Lifetime::Singleton => Arc::new(SingletonProvider::new(provider)),
            Lifetime::Prototype => provider,
        }
    }

    fn register(self, provider: Arc<dyn Provider>) -> Arc<BindingHierarchy> {
        let hierarchy = self.context.hierarchy(&self.key.build());
        match self.priority {
            Some(priority) => hierarchy.add_at(priority, provider),
            None => hierarchy.add(provider),
        };
        hierarchy
    }
}
