//! Providers: capabilities that produce component instances.
//!
//! Every binding in a [`BindingHierarchy`](crate::BindingHierarchy) is a
//! [`Provider`]. Resolution invokes the highest-priority provider with the
//! owning [`ApplicationContext`], which lets providers resolve their own
//! dependencies recursively.
//!
//! | Provider | Produces |
//! |----------|----------|
//! | [`InstanceProvider`] | an existing shared value |
//! | [`SupplierProvider`] | the result of a zero-argument factory |
//! | [`FactoryProvider`] | the result of a factory with context access |
//! | [`ContextDrivenProvider`] | a value built through its optimal constructor |
//! | [`BoundFactoryProvider`] | a value built from explicit arguments |
//! | [`ComposedProvider`] | another provider's value, post-processed |
//! | [`SingletonProvider`] | another provider's first value, cached |

use std::fmt;
use std::sync::Arc;

use crate::application::ApplicationContext;
use crate::error::{BoxError, DiError, DiResult};
use crate::instance::Instance;
use crate::key::TypeKey;

mod composed;
mod context_driven;

pub use composed::{ComposedProvider, SingletonProvider};
pub use context_driven::{BoundFactoryProvider, ContextDrivenProvider};

/// Diagnostic classification of a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Instance,
    Supplier,
    Factory,
    ContextDriven,
    BoundFactory,
    Composed,
    Singleton,
    /// User-defined provider
    Custom(&'static str),
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Instance => f.write_str("instance"),
            ProviderKind::Supplier => f.write_str("supplier"),
            ProviderKind::Factory => f.write_str("factory"),
            ProviderKind::ContextDriven => f.write_str("context-driven"),
            ProviderKind::BoundFactory => f.write_str("bound-factory"),
            ProviderKind::Composed => f.write_str("composed"),
            ProviderKind::Singleton => f.write_str("singleton"),
            ProviderKind::Custom(name) => f.write_str(name),
        }
    }
}

/// Produces instances of one contract type.
///
/// `Ok(None)` means the provider could not produce a value without that being
/// an error (for example, no usable constructor). Resolution then continues
/// with its strict/loose fallback. `Err` is the outcome of the request.
///
/// Providers must not mutate the hierarchy that holds them.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{ApplicationContext, DiResult, Instance, Provider, ProviderKind, Resolver};
/// use std::sync::Arc;
///
/// struct Answer;
///
/// impl Provider for Answer {
///     fn provide(&self, _context: &ApplicationContext) -> DiResult<Option<Instance>> {
///         Ok(Some(Instance::of(42u64)))
///     }
///
///     fn kind(&self) -> ProviderKind {
///         ProviderKind::Custom("answer")
///     }
/// }
///
/// let context = ApplicationContext::new();
/// context.bind::<u64>().provider(Arc::new(Answer));
/// assert_eq!(*context.get_typed::<u64>().unwrap(), 42);
/// ```
pub trait Provider: Send + Sync + 'static {
    fn provide(&self, context: &ApplicationContext) -> DiResult<Option<Instance>>;

    fn kind(&self) -> ProviderKind;

    /// The wrapped provider, for composed providers.
    fn composed_inner(&self) -> Option<&Arc<dyn Provider>> {
        None
    }
}

/// Follows composed providers down to the concrete one.
pub fn unwrap_provider(provider: &Arc<dyn Provider>) -> Arc<dyn Provider> {
    let mut current = provider.clone();
    while let Some(inner) = current.composed_inner().cloned() {
        current = inner;
    }
    current
}

/// Always yields the wrapped instance.
pub struct InstanceProvider {
    instance: Instance,
}

impl InstanceProvider {
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self::from_instance(Instance::new(value))
    }

    pub fn from_instance(instance: Instance) -> Self {
        Self { instance }
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }
}

impl Provider for InstanceProvider {
    fn provide(&self, _context: &ApplicationContext) -> DiResult<Option<Instance>> {
        Ok(Some(self.instance.clone()))
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Instance
    }
}

type SupplierFn = Arc<dyn Fn() -> Result<Instance, BoxError> + Send + Sync>;

/// Invokes a zero-argument factory on every request.
pub struct SupplierProvider {
    type_key: TypeKey,
    supplier: SupplierFn,
}

impl SupplierProvider {
    pub fn new<T, F>(supplier: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Result<Arc<T>, BoxError> + Send + Sync + 'static,
    {
        Self {
            type_key: TypeKey::of::<T>(),
            supplier: Arc::new(move || -> Result<Instance, BoxError> {
                supplier().map(Instance::new)
            }),
        }
    }
}

impl Provider for SupplierProvider {
    fn provide(&self, _context: &ApplicationContext) -> DiResult<Option<Instance>> {
        (self.supplier)()
            .map(Some)
            .map_err(|source| DiError::ProviderFailed {
                key: self.type_key.name().to_string(),
                source,
            })
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Supplier
    }
}

type FactoryFn = Arc<dyn Fn(&ApplicationContext) -> DiResult<Instance> + Send + Sync>;

/// Invokes a factory that may resolve other components through the context.
///
/// This is the shape of configuration-style factory methods: the factory
/// receives the application context and pulls what it needs.
pub struct FactoryProvider {
    factory: FactoryFn,
}

impl FactoryProvider {
    pub fn new<T, F>(factory: F) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&ApplicationContext) -> DiResult<Arc<T>> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(move |context: &ApplicationContext| -> DiResult<Instance> {
                factory(context).map(Instance::new)
            }),
        }
    }
}

impl Provider for FactoryProvider {
    fn provide(&self, context: &ApplicationContext) -> DiResult<Option<Instance>> {
        (self.factory)(context).map(Some)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::Factory
    }
}
