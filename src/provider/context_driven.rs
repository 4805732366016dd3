//! Providers that build values from registered type descriptors.

use std::any::Any;

use tracing::debug;

use crate::application::ApplicationContext;
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::introspect::{Arguments, ConstructorView, TypeView};
use crate::key::TypeKey;
use crate::provider::{Provider, ProviderKind};

/// Builds a value through its type's optimal constructor.
///
/// The optimal constructor is the injectable constructor with the most
/// parameters, the first declared one winning ties. Without injectable
/// constructors the default constructor is used. A type with neither, or
/// with no registered [`TypeView`], produces nothing rather than an error.
///
/// Constructor arguments are resolved through the context, and the new value
/// is populated before it is shared.
#[derive(Debug, Clone, Copy)]
pub struct ContextDrivenProvider {
    type_key: TypeKey,
}

impl ContextDrivenProvider {
    pub fn new(type_key: TypeKey) -> Self {
        Self { type_key }
    }

    pub fn of<T: Send + Sync + 'static>() -> Self {
        Self::new(TypeKey::of::<T>())
    }

    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    pub fn optimal_constructor(view: &TypeView) -> Option<&ConstructorView> {
        view.injectable_constructors()
            .fold(None, |best: Option<&ConstructorView>, candidate| match best {
                Some(best) if best.parameter_count() >= candidate.parameter_count() => Some(best),
                _ => Some(candidate),
            })
            .or_else(|| view.default_constructor())
    }
}

impl Provider for ContextDrivenProvider {
    fn provide(&self, context: &ApplicationContext) -> DiResult<Option<Instance>> {
        let Some(view) = context.type_view(self.type_key) else {
            debug!(component = %self.type_key, "No type view registered");
            return Ok(None);
        };
        let Some(constructor) = Self::optimal_constructor(&view) else {
            debug!(component = %self.type_key, "No injectable or default constructor");
            return Ok(None);
        };

        let arguments = context.resolve_arguments(constructor.parameters(), view.name())?;
        build(context, &view, constructor, &arguments).map(Some)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::ContextDriven
    }
}

/// Builds a value from explicit arguments.
///
/// Bound constructors are scanned in declaration order. The first whose arity
/// matches and whose parameter types accept every present argument wins. A
/// type declaring exactly one constructor falls back to it when its arity
/// matches. Anything else produces nothing.
#[derive(Debug, Clone)]
pub struct BoundFactoryProvider {
    type_key: TypeKey,
    arguments: Vec<Option<Instance>>,
}

impl BoundFactoryProvider {
    pub fn new(type_key: TypeKey, arguments: Vec<Option<Instance>>) -> Self {
        Self { type_key, arguments }
    }

    pub fn of<T: Send + Sync + 'static>(arguments: Vec<Option<Instance>>) -> Self {
        Self::new(TypeKey::of::<T>(), arguments)
    }

    /// Arguments converted to the constructor's parameter types, or `None`
    /// when the constructor does not accept them.
    fn accept(
        &self,
        context: &ApplicationContext,
        constructor: &ConstructorView,
    ) -> Option<Arguments> {
        if constructor.parameter_count() != self.arguments.len() {
            return None;
        }
        constructor
            .parameters()
            .iter()
            .zip(&self.arguments)
            .map(|(parameter, argument)| match argument {
                None => Some(None),
                Some(instance) => context
                    .assign(instance, parameter.key().type_key())
                    .map(Some),
            })
            .collect::<Option<Vec<_>>>()
            .map(Arguments::new)
    }
}

impl Provider for BoundFactoryProvider {
    fn provide(&self, context: &ApplicationContext) -> DiResult<Option<Instance>> {
        let Some(view) = context.type_view(self.type_key) else {
            debug!(component = %self.type_key, "No type view registered");
            return Ok(None);
        };

        let matched = view
            .bound_constructors()
            .find_map(|constructor| self.accept(context, constructor).map(|args| (constructor, args)));
        if let Some((constructor, arguments)) = matched {
            return build(context, &view, constructor, &arguments).map(Some);
        }

        if let [single] = view.constructors() {
            if let Some(arguments) = self.accept(context, single) {
                return match build(context, &view, single, &arguments) {
                    Ok(instance) => Ok(Some(instance)),
                    Err(error) => {
                        debug!(component = %self.type_key, %error, "Single constructor fallback failed");
                        Ok(None)
                    }
                };
            }
        }

        debug!(
            component = %self.type_key,
            arguments = self.arguments.len(),
            "No bound constructor matches the arguments"
        );
        Ok(None)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::BoundFactory
    }
}

fn build(
    context: &ApplicationContext,
    view: &TypeView,
    constructor: &ConstructorView,
    arguments: &Arguments,
) -> DiResult<Instance> {
    let mut value = constructor
        .invoke(arguments)
        .map_err(|source| DiError::ProviderFailed {
            key: view.name().to_string(),
            source,
        })?;
    let target: &mut dyn Any = &mut *value;
    context.populate_any(target)?;
    view.finish(value).ok_or(DiError::TypeMismatch {
        expected: view.name(),
        found: "constructor result",
    })
}
