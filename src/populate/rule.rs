//! Rules deciding whether an injection point must be satisfied.

use std::sync::Arc;

use crate::introspect::InjectionPoint;
use crate::populate::ComponentInjectionPoint;

/// One vote on whether `point` is required.
///
/// A point is required only when every active rule says so; with no rules
/// every point is required.
pub trait RequireInjectionPointRule: Send + Sync {
    fn is_required(&self, point: &InjectionPoint, declaration: &ComponentInjectionPoint) -> bool;
}

/// Honours explicit `Required(false)` annotations on the point or on the
/// member declaring it.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnnotatedRequireRule;

impl RequireInjectionPointRule for AnnotatedRequireRule {
    fn is_required(&self, point: &InjectionPoint, declaration: &ComponentInjectionPoint) -> bool {
        point
            .annotations()
            .required()
            .or_else(|| declaration.annotations().required())
            .unwrap_or(true)
    }
}

impl<F> RequireInjectionPointRule for F
where
    F: Fn(&InjectionPoint, &ComponentInjectionPoint) -> bool + Send + Sync,
{
    fn is_required(&self, point: &InjectionPoint, declaration: &ComponentInjectionPoint) -> bool {
        self(point, declaration)
    }
}

pub(crate) fn all_require(
    rules: &[Arc<dyn RequireInjectionPointRule>],
    point: &InjectionPoint,
    declaration: &ComponentInjectionPoint,
) -> bool {
    rules
        .iter()
        .fold(true, |required, rule| required && rule.is_required(point, declaration))
}
