//! Population strategies.
//!
//! A strategy claims the injection points it can serve and resolves a value
//! for each of their nested points. The shared [`populate`] algorithm applies
//! the required policy and writes the values back.
//!
//! [`populate`]: ComponentPopulationStrategy::populate

use tracing::debug;

use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::introspect::InjectionPoint;
use crate::populate::{ComponentInjectionPoint, PopulateComponentContext};

pub trait ComponentPopulationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_applicable(&self, point: &ComponentInjectionPoint) -> bool;

    /// Resolves one nested point. `Ok(None)` means no value is available.
    fn resolve(
        &self,
        context: &PopulateComponentContext<'_>,
        point: &InjectionPoint,
    ) -> DiResult<Option<Instance>>;

    /// Resolves every nested point of `point` and applies the values.
    ///
    /// A failed or absent value for a required point aborts population. For
    /// an optional point the failure goes to the exception handler and the
    /// slot stays absent.
    fn populate(
        &self,
        context: &mut PopulateComponentContext<'_>,
        point: &ComponentInjectionPoint,
    ) -> DiResult<()> {
        let application = context.application();
        let owner = context.view().name();
        let mut objects = Vec::with_capacity(point.injection_points().len());

        for nested in point.injection_points() {
            let required = application.is_required(nested, point);
            let label = || nested_label(point, nested);
            let value = match self.resolve(context, nested) {
                Ok(value) => value,
                Err(error) if required => {
                    return Err(DiError::ComponentRequired {
                        point: label(),
                        owner,
                        source: Box::new(error),
                    });
                }
                Err(error) => {
                    application
                        .exception_handler()
                        .handle(&label(), owner, &error);
                    None
                }
            };
            if value.is_none() && required {
                return Err(DiError::RequiredNotProvided {
                    point: label(),
                    owner,
                });
            }
            objects.push(value);
        }

        debug!(strategy = self.name(), point = %point, "Applying injection point");
        point.process_objects(context.instance_mut(), objects)
    }
}

/// `Owner.field` for fields, `Owner.method(param)` for method parameters.
fn nested_label(point: &ComponentInjectionPoint, nested: &InjectionPoint) -> String {
    if point.is_field() {
        point.qualified_name()
    } else {
        format!("{}({})", point.qualified_name(), nested.name())
    }
}

/// Resolves points through the application's bindings.
#[derive(Debug, Default, Clone, Copy)]
pub struct InjectPopulationStrategy;

impl ComponentPopulationStrategy for InjectPopulationStrategy {
    fn name(&self) -> &'static str {
        "inject"
    }

    fn is_applicable(&self, point: &ComponentInjectionPoint) -> bool {
        !point
            .injection_points()
            .iter()
            .any(|p| p.annotations().has_context())
    }

    fn resolve(
        &self,
        context: &PopulateComponentContext<'_>,
        point: &InjectionPoint,
    ) -> DiResult<Option<Instance>> {
        context.application().get(point.key()).map(Some)
    }
}

/// Resolves points annotated `Context` from the application's named
/// context values. Other parameters of the same method resolve through the
/// bindings.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContextPopulationStrategy;

impl ComponentPopulationStrategy for ContextPopulationStrategy {
    fn name(&self) -> &'static str {
        "context"
    }

    fn is_applicable(&self, point: &ComponentInjectionPoint) -> bool {
        point
            .injection_points()
            .iter()
            .any(|p| p.annotations().has_context())
    }

    fn resolve(
        &self,
        context: &PopulateComponentContext<'_>,
        point: &InjectionPoint,
    ) -> DiResult<Option<Instance>> {
        let application = context.application();
        if point.annotations().has_context() {
            application.context_value(point)
        } else {
            application.get(point.key()).map(Some)
        }
    }
}
