//! The application context: owner of bindings, descriptors and engines.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::binding::{Binder, BindingHierarchy};
use crate::config::InjectConfig;
use crate::descriptors::BindingDescriptor;
use crate::error::{DiError, DiResult};
use crate::handler::ExceptionHandler;
use crate::instance::Instance;
use crate::internal::KeyMap;
use crate::introspect::{Arguments, InjectionPoint, TypeRegistry, TypeView};
use crate::key::{ComponentKey, ComponentKeyView, TypeKey};
use crate::observer::Observers;
use crate::populate::{ComponentInjectionPoint, ComponentPopulator};
use crate::provider::{unwrap_provider, BoundFactoryProvider, Provider};
use crate::proxy::ProxyOrchestrator;
use crate::resolution;
use crate::traits::ResolverCore;

mod builder;
mod module;

pub use builder::ApplicationBuilder;
pub use module::ComponentModule;

/// Shared handle to one application's bindings and engines.
///
/// Cloning is cheap; clones share all state. Binding hierarchies are created
/// on first access and live as long as the context.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{
///     ApplicationContext, ConstructorView, FieldView, InjectionPoint, Resolver, TypeView,
/// };
/// use std::sync::Arc;
///
/// struct Config {
///     url: String,
/// }
///
/// struct Repository {
///     config: Arc<Config>,
///     cache: Option<Arc<u32>>,
/// }
///
/// let context = ApplicationContext::new();
/// context.register_type(
///     TypeView::builder::<Repository>()
///         .constructor(
///             ConstructorView::new(vec![InjectionPoint::of::<Config>("config")], |args| {
///                 Ok(Repository { config: args.required::<Config>(0)?, cache: None })
///             })
///             .injectable(),
///         )
///         .field(FieldView::value::<Repository, u32>("cache", |r| &mut r.cache).inject())
///         .build(),
/// );
///
/// context.bind::<Config>().singleton(Config { url: "postgres://db".into() });
/// context.bind::<u32>().singleton(64);
/// context.bind::<Repository>().to_self();
///
/// let repository = context.get_typed::<Repository>().unwrap();
/// assert_eq!(repository.config.url, "postgres://db");
/// assert_eq!(repository.cache.as_deref(), Some(&64));
/// ```
#[derive(Clone)]
pub struct ApplicationContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    config: InjectConfig,
    hierarchies: RwLock<KeyMap<ComponentKeyView, Arc<BindingHierarchy>>>,
    types: TypeRegistry,
    proxies: Arc<dyn ProxyOrchestrator>,
    populator: ComponentPopulator,
    observers: Observers,
    exception_handler: Arc<dyn ExceptionHandler>,
    context_values: RwLock<KeyMap<String, Instance>>,
}

impl ApplicationContext {
    /// Context with default configuration, strategies and rules.
    pub fn new() -> Self {
        ApplicationBuilder::new().build()
    }

    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    pub fn config(&self) -> &InjectConfig {
        &self.inner.config
    }

    /// The hierarchy for `key`, created empty if absent.
    pub fn hierarchy(&self, key: &ComponentKey) -> Arc<BindingHierarchy> {
        let view = key.view();
        if let Some(hierarchy) = self.find_hierarchy(&view) {
            return hierarchy;
        }
        self.inner
            .hierarchies
            .write()
            .entry(view)
            .or_insert_with_key(|view| Arc::new(BindingHierarchy::new(view.clone())))
            .clone()
    }

    pub fn find_hierarchy(&self, key: &ComponentKeyView) -> Option<Arc<BindingHierarchy>> {
        self.inner.hierarchies.read().get(key).cloned()
    }

    /// Installs a prepared hierarchy.
    ///
    /// An existing hierarchy for the same key absorbs the installed entries
    /// in place, so they win priority collisions and handles obtained earlier
    /// from [`hierarchy`](Self::hierarchy) keep declaring into the context.
    pub fn install_hierarchy(&self, hierarchy: BindingHierarchy) -> Arc<BindingHierarchy> {
        let mut hierarchies = self.inner.hierarchies.write();
        if let Some(existing) = hierarchies.get(hierarchy.key()) {
            existing.absorb(&hierarchy);
            return existing.clone();
        }
        let installed = Arc::new(hierarchy);
        hierarchies.insert(installed.key().clone(), installed.clone());
        installed
    }

    /// All hierarchies, ordered by key.
    pub fn hierarchies(&self) -> Vec<Arc<BindingHierarchy>> {
        let mut hierarchies: Vec<_> = self.inner.hierarchies.read().values().cloned().collect();
        hierarchies.sort_by(|a, b| a.key().cmp(b.key()));
        hierarchies
    }

    /// Starts a binding declaration for contract `T`.
    pub fn bind<T: ?Sized + Send + Sync + 'static>(&self) -> Binder<'_, T> {
        Binder::new(self)
    }

    /// Runs a module's declarations against this context.
    pub fn install<M: ComponentModule>(&self, module: M) -> DiResult<&Self> {
        debug!(module = module.name(), "Installing module");
        module.configure(self)?;
        Ok(self)
    }

    /// Resolves `key` through its binding hierarchy.
    pub fn get(&self, key: &ComponentKey) -> DiResult<Instance> {
        resolution::resolve(self, key)
    }

    /// Builds a `T` from explicit arguments through its bound constructors.
    pub fn factory<T: Send + Sync + 'static>(&self, arguments: Vec<Option<Instance>>) -> DiResult<Arc<T>> {
        let provider = BoundFactoryProvider::of::<T>(arguments);
        match provider.provide(self)? {
            Some(instance) => instance.try_downcast::<T>(),
            None => Err(DiError::ComponentResolution {
                key: format!("{} (bound factory)", std::any::type_name::<T>()),
            }),
        }
    }

    /// Injects values into an existing instance.
    pub fn populate<T: 'static>(&self, instance: &mut T) -> DiResult<()> {
        self.populate_any(instance)
    }

    pub fn populate_any(&self, instance: &mut dyn Any) -> DiResult<()> {
        self.inner.populator.populate(self, instance)
    }

    /// Stores a named value for points annotated `Context`.
    pub fn add_context<T: ?Sized + Send + Sync + 'static>(&self, name: impl Into<String>, value: Arc<T>) {
        self.inner
            .context_values
            .write()
            .insert(name.into(), Instance::new(value));
    }

    /// One descriptor per hierarchy entry, hierarchies in key order and
    /// entries by descending priority.
    pub fn binding_descriptors(&self) -> Vec<BindingDescriptor> {
        self.hierarchies()
            .iter()
            .flat_map(|hierarchy| {
                hierarchy
                    .entries()
                    .into_iter()
                    .map(move |(priority, provider)| BindingDescriptor {
                        key: hierarchy.key().clone(),
                        priority,
                        provider: provider.kind(),
                        concrete: unwrap_provider(&provider).kind(),
                    })
            })
            .collect()
    }

    pub fn register_type(&self, view: TypeView) -> Arc<TypeView> {
        self.inner.types.register(view)
    }

    pub fn type_view(&self, key: TypeKey) -> Option<Arc<TypeView>> {
        self.inner.types.get(key)
    }

    pub fn type_registry(&self) -> &TypeRegistry {
        &self.inner.types
    }

    pub fn proxies(&self) -> &dyn ProxyOrchestrator {
        &*self.inner.proxies
    }

    pub fn populator(&self) -> &ComponentPopulator {
        &self.inner.populator
    }

    pub fn exception_handler(&self) -> &dyn ExceptionHandler {
        &*self.inner.exception_handler
    }

    pub(crate) fn observers(&self) -> &Observers {
        &self.inner.observers
    }

    pub(crate) fn is_required(&self, point: &InjectionPoint, declaration: &ComponentInjectionPoint) -> bool {
        self.inner.populator.is_required(point, declaration)
    }

    /// Views `instance` as `target`, directly or through a declared supertype.
    pub(crate) fn assign(&self, instance: &Instance, target: TypeKey) -> Option<Instance> {
        if instance.type_key() == target {
            return Some(instance.clone());
        }
        self.type_view(instance.type_key())?.upcast(instance, target)
    }

    /// The named context value for `point`, keyed by its name qualifier or,
    /// failing that, its own name.
    pub(crate) fn context_value(&self, point: &InjectionPoint) -> DiResult<Option<Instance>> {
        let name = point.key().name().unwrap_or(point.name());
        let Some(instance) = self.inner.context_values.read().get(name).cloned() else {
            return Ok(None);
        };
        let target = point.key().type_key();
        self.assign(&instance, target)
            .map(Some)
            .ok_or(DiError::TypeMismatch {
                expected: target.name(),
                found: instance.type_key().name(),
            })
    }

    /// Resolves constructor parameters positionally.
    pub(crate) fn resolve_arguments(
        &self,
        parameters: &[InjectionPoint],
        owner: &'static str,
    ) -> DiResult<Arguments> {
        let mut values = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            let required = parameter.annotations().required().unwrap_or(true);
            let resolved = if parameter.annotations().has_context() {
                self.context_value(parameter)
            } else {
                self.get(parameter.key()).map(Some)
            };
            let label = || format!("{owner}::new({})", parameter.name());
            let value = match resolved {
                Ok(value) => value,
                Err(error) if required => {
                    return Err(DiError::ComponentRequired {
                        point: label(),
                        owner,
                        source: Box::new(error),
                    });
                }
                Err(error) => {
                    self.exception_handler().handle(&label(), owner, &error);
                    None
                }
            };
            if value.is_none() && required {
                return Err(DiError::RequiredNotProvided { point: label(), owner });
            }
            values.push(value);
        }
        Ok(Arguments::new(values))
    }
}

impl Default for ApplicationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverCore for ApplicationContext {
    fn resolve_component(&self, key: &ComponentKey) -> DiResult<Instance> {
        self.get(key)
    }
}

impl fmt::Debug for ApplicationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationContext")
            .field("config", &self.inner.config)
            .field("hierarchies", &self.inner.hierarchies.read().len())
            .field("types", &self.inner.types)
            .field("populator", &self.inner.populator)
            .finish()
    }
}
