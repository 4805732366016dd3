//! Construction of [`ApplicationContext`] instances.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::application::{ApplicationContext, ContextInner};
use crate::config::InjectConfig;
use crate::handler::{ExceptionHandler, LoggingExceptionHandler};
use crate::internal::KeyMap;
use crate::introspect::{TypeRegistry, TypeView};
use crate::observer::{Observers, ResolutionObserver};
use crate::populate::{
    AnnotatedInjectionPointResolver, AnnotatedRequireRule, CachingInjectionPointResolver,
    ComponentPopulationStrategy, ComponentPopulator, ContextPopulationStrategy,
    InjectPopulationStrategy, InjectionPointResolver, RequireInjectionPointRule,
};
use crate::proxy::{Proxy, ProxyOrchestrator, ProxyRegistry};

/// Builder for [`ApplicationContext`].
///
/// Unset parts take defaults: configuration from [`InjectConfig::default`],
/// the inject and context population strategies, the annotated require rule,
/// a caching annotated injection point resolver and a logging exception
/// handler.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{ApplicationContext, ComponentKey, InjectConfig, Resolver};
///
/// let context = ApplicationContext::builder()
///     .config(InjectConfig::default().strict_mode(false))
///     .build();
/// assert!(!context.config().strict_mode);
/// ```
pub struct ApplicationBuilder {
    config: InjectConfig,
    types: Vec<TypeView>,
    proxies: ProxyRegistry,
    orchestrator: Option<Arc<dyn ProxyOrchestrator>>,
    observers: Observers,
    exception_handler: Option<Arc<dyn ExceptionHandler>>,
    strategies: Vec<Arc<dyn ComponentPopulationStrategy>>,
    rules: Option<Vec<Arc<dyn RequireInjectionPointRule>>>,
    resolver: Option<Arc<dyn InjectionPointResolver>>,
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self {
            config: InjectConfig::default(),
            types: Vec::new(),
            proxies: ProxyRegistry::new(),
            orchestrator: None,
            observers: Observers::new(),
            exception_handler: None,
            strategies: Vec::new(),
            rules: None,
            resolver: None,
        }
    }

    pub fn config(mut self, config: InjectConfig) -> Self {
        self.config = config;
        self
    }

    pub fn type_view(mut self, view: TypeView) -> Self {
        self.types.push(view);
        self
    }

    /// Registers `P` with the default proxy registry.
    pub fn proxy<P: Proxy>(self) -> Self {
        self.proxies.register::<P>();
        self
    }

    /// Replaces the proxy registry with a custom orchestrator.
    pub fn proxy_orchestrator(mut self, orchestrator: Arc<dyn ProxyOrchestrator>) -> Self {
        self.orchestrator = Some(orchestrator);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn ResolutionObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    pub fn exception_handler(mut self, handler: Arc<dyn ExceptionHandler>) -> Self {
        self.exception_handler = Some(handler);
        self
    }

    /// Appends a population strategy. When any strategy is added, only the
    /// added ones run, in the order added.
    pub fn strategy(mut self, strategy: Arc<dyn ComponentPopulationStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Adds a require rule. The annotated rule is kept unless
    /// [`without_default_rules`](Self::without_default_rules) was called
    /// first.
    pub fn rule(mut self, rule: Arc<dyn RequireInjectionPointRule>) -> Self {
        self.rules
            .get_or_insert_with(default_rules)
            .push(rule);
        self
    }

    /// Starts from an empty rule set; every point is then required unless
    /// a rule added afterwards says otherwise.
    pub fn without_default_rules(mut self) -> Self {
        self.rules = Some(Vec::new());
        self
    }

    pub fn injection_point_resolver(mut self, resolver: Arc<dyn InjectionPointResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn build(self) -> ApplicationContext {
        let strategies = if self.strategies.is_empty() {
            vec![
                Arc::new(InjectPopulationStrategy) as Arc<dyn ComponentPopulationStrategy>,
                Arc::new(ContextPopulationStrategy) as Arc<dyn ComponentPopulationStrategy>,
            ]
        } else {
            self.strategies
        };
        let rules = self.rules.unwrap_or_else(default_rules);
        let resolver = self.resolver.unwrap_or_else(|| {
            Arc::new(CachingInjectionPointResolver::new(
                AnnotatedInjectionPointResolver::new(self.config.populate_type),
            ))
        });

        let types = TypeRegistry::new();
        for view in self.types {
            types.register(view);
        }

        ApplicationContext {
            inner: Arc::new(ContextInner {
                config: self.config,
                hierarchies: RwLock::new(KeyMap::default()),
                types,
                proxies: self
                    .orchestrator
                    .unwrap_or_else(|| Arc::new(self.proxies)),
                populator: ComponentPopulator::new(resolver, strategies, rules),
                observers: self.observers,
                exception_handler: self
                    .exception_handler
                    .unwrap_or_else(|| Arc::new(LoggingExceptionHandler)),
                context_values: RwLock::new(KeyMap::default()),
            }),
        }
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_rules() -> Vec<Arc<dyn RequireInjectionPointRule>> {
    vec![Arc::new(AnnotatedRequireRule)]
}
