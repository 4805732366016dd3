//! The component resolution engine.
//!
//! Resolving a [`ComponentKey`]:
//!
//! 1. Find the binding hierarchy for the key's view (type and qualifiers).
//!    Keys marked install-if-absent get a hierarchy with a
//!    [`ContextDrivenProvider`] in the default slot when none exists.
//! 2. Invoke the highest-priority provider. A value ends resolution; an
//!    error is the outcome of the request. Lower priorities are never tried.
//! 3. With no value, a strict key fails with
//!    [`DiError::ComponentResolution`]. A loose key looks for hierarchies with
//!    the same qualifiers whose type declares the requested type as a
//!    supertype, tried in type-name order, and upcasts the first value found.
//!
//! Each resolution occupies one frame of a per-thread stack, which reports
//! cycles as [`DiError::Circular`] and bounds nesting depth.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, trace};

use crate::application::ApplicationContext;
use crate::binding::BindingHierarchy;
use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::internal::ResolutionGuard;
use crate::introspect::TypeView;
use crate::key::{ComponentKey, ComponentKeyView};
use crate::provider::ContextDrivenProvider;

pub(crate) fn resolve(context: &ApplicationContext, key: &ComponentKey) -> DiResult<Instance> {
    let view = key.view();
    let _guard = ResolutionGuard::enter(view.to_string(), context.config().max_depth)?;

    let observers = context.observers();
    if !observers.has_observers() {
        return resolve_view(context, key, &view);
    }

    observers.resolving(key);
    let started = Instant::now();
    let result = resolve_view(context, key, &view);
    match &result {
        Ok(_) => observers.resolved(key, started.elapsed()),
        Err(error) => observers.resolution_failed(key, error),
    }
    result
}

fn resolve_view(
    context: &ApplicationContext,
    key: &ComponentKey,
    view: &ComponentKeyView,
) -> DiResult<Instance> {
    let hierarchy = match context.find_hierarchy(view) {
        Some(hierarchy) => Some(hierarchy),
        None if key.install_if_absent() => Some(install(context, key)),
        None => None,
    };

    if let Some(hierarchy) = &hierarchy {
        if let Some(instance) = provide(context, hierarchy)? {
            return Ok(instance);
        }
    }

    if key.strictness().is_strict(context.config().strict_mode) {
        return Err(unresolved(key));
    }
    resolve_loose(context, key, view)
}

fn install(context: &ApplicationContext, key: &ComponentKey) -> Arc<BindingHierarchy> {
    let hierarchy = context.hierarchy(key);
    if hierarchy.is_empty() {
        debug!(key = %key, "Installing context-driven binding");
        hierarchy.add(Arc::new(ContextDrivenProvider::new(key.type_key())));
    }
    hierarchy
}

fn provide(context: &ApplicationContext, hierarchy: &BindingHierarchy) -> DiResult<Option<Instance>> {
    let Some(provider) = hierarchy.highest() else {
        return Ok(None);
    };
    let provided = provider.provide(context)?;
    if provided.is_none() {
        trace!(key = %hierarchy.key(), kind = %provider.kind(), "Provider produced no value");
    }
    Ok(provided)
}

fn resolve_loose(
    context: &ApplicationContext,
    key: &ComponentKey,
    view: &ComponentKeyView,
) -> DiResult<Instance> {
    let target = view.type_key();
    let mut candidates: Vec<(Arc<BindingHierarchy>, Arc<TypeView>)> = context
        .hierarchies()
        .into_iter()
        .filter(|h| h.key().qualifier() == view.qualifier() && h.key().type_key() != target)
        .filter_map(|h| {
            let type_view = context.type_view(h.key().type_key())?;
            type_view.is_assignable_to(target).then_some((h, type_view))
        })
        .collect();
    candidates.sort_by_key(|(h, _)| h.key().type_key().name());

    for (hierarchy, type_view) in candidates {
        let Some(instance) = provide(context, &hierarchy)? else {
            continue;
        };
        if let Some(instance) = type_view.upcast(&instance, target) {
            debug!(
                requested = %key,
                found = %hierarchy.key(),
                "Resolved through compatible binding"
            );
            return Ok(instance);
        }
    }
    Err(unresolved(key))
}

fn unresolved(key: &ComponentKey) -> DiError {
    DiError::ComponentResolution {
        key: key.to_string(),
    }
}
