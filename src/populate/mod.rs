//! Component population: injecting values into constructed instances.
//!
//! [`ComponentPopulator::populate`] runs one population pass:
//!
//! 1. Unwrap: a registered proxy is replaced by its delegate as the
//!    modifiable instance.
//! 2. Discover: the [`InjectionPointResolver`] lists the injection points of
//!    the modifiable instance's type.
//! 3. Apply: each strategy, in order, populates every injection point it is
//!    applicable to.
//!
//! Values applied before a failure stay applied; the error names the point
//! and the owning type.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::application::ApplicationContext;
use crate::error::DiResult;
use crate::introspect::{InjectionPoint, TypeView};

mod injection_point;
mod rule;
mod strategy;

pub use injection_point::{
    AnnotatedInjectionPointResolver, CachingInjectionPointResolver, ComponentInjectionPoint,
    Declaration, InjectionPointResolver,
};
pub use rule::{AnnotatedRequireRule, RequireInjectionPointRule};
pub use strategy::{ComponentPopulationStrategy, ContextPopulationStrategy, InjectPopulationStrategy};

/// State of one population pass.
pub struct PopulateComponentContext<'a> {
    instance: &'a mut dyn Any,
    original_type: TypeId,
    proxied: bool,
    view: Arc<TypeView>,
    application: &'a ApplicationContext,
}

impl<'a> PopulateComponentContext<'a> {
    /// The instance being written to (the delegate, when proxied).
    pub fn instance(&self) -> &dyn Any {
        &*self.instance
    }

    pub fn instance_mut(&mut self) -> &mut dyn Any {
        &mut *self.instance
    }

    /// `TypeId` of the instance handed to `populate`.
    pub fn original_type(&self) -> TypeId {
        self.original_type
    }

    pub fn is_proxied(&self) -> bool {
        self.proxied
    }

    pub fn view(&self) -> &TypeView {
        &self.view
    }

    pub fn application(&self) -> &'a ApplicationContext {
        self.application
    }
}

impl fmt::Debug for PopulateComponentContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopulateComponentContext")
            .field("type", &self.view.name())
            .field("proxied", &self.proxied)
            .finish()
    }
}

/// Drives population passes.
pub struct ComponentPopulator {
    resolver: Arc<dyn InjectionPointResolver>,
    strategies: Vec<Arc<dyn ComponentPopulationStrategy>>,
    rules: Vec<Arc<dyn RequireInjectionPointRule>>,
}

impl ComponentPopulator {
    pub fn new(
        resolver: Arc<dyn InjectionPointResolver>,
        strategies: Vec<Arc<dyn ComponentPopulationStrategy>>,
        rules: Vec<Arc<dyn RequireInjectionPointRule>>,
    ) -> Self {
        Self {
            resolver,
            strategies,
            rules,
        }
    }

    /// Whether every rule requires `point`.
    pub fn is_required(&self, point: &InjectionPoint, declaration: &ComponentInjectionPoint) -> bool {
        rule::all_require(&self.rules, point, declaration)
    }

    pub fn strategies(&self) -> &[Arc<dyn ComponentPopulationStrategy>] {
        &self.strategies
    }

    /// Populates `instance` in place.
    ///
    /// A type without a registered view has nothing to populate.
    pub fn populate(&self, application: &ApplicationContext, instance: &mut dyn Any) -> DiResult<()> {
        let started = Instant::now();
        let original_type = (*instance).type_id();
        let proxies = application.proxies();

        let proxied = proxies.delegate(&*instance).is_some();
        let target: &mut dyn Any = if proxied {
            match proxies.delegate_mut(instance) {
                Some(delegate) => delegate,
                None => return Ok(()),
            }
        } else {
            instance
        };

        let type_id = (*target).type_id();
        let Some(view) = application.type_registry().get_by_id(type_id) else {
            debug!(?type_id, proxied, "No type view registered; nothing to populate");
            return Ok(());
        };
        let component = view.key();
        let points = self.resolver.resolve(&view);

        let mut context = PopulateComponentContext {
            instance: target,
            original_type,
            proxied,
            view,
            application,
        };
        for strategy in &self.strategies {
            for point in points.iter().filter(|p| strategy.is_applicable(p)) {
                strategy.populate(&mut context, point)?;
            }
        }

        debug!(%component, points = points.len(), proxied, "Component populated");
        application.observers().populated(component, started.elapsed());
        Ok(())
    }
}

impl fmt::Debug for ComponentPopulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentPopulator")
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("rules", &self.rules.len())
            .finish()
    }
}
