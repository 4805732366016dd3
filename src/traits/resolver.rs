//! Resolver traits for component resolution.

use std::sync::Arc;

use crate::error::DiResult;
use crate::instance::Instance;
use crate::key::ComponentKey;

/// Object-safe component resolution.
///
/// Most users should use the [`Resolver`] trait instead, which provides typed
/// helpers on top of this one.
pub trait ResolverCore: Send + Sync {
    /// Resolves `key` to a type-erased instance.
    fn resolve_component(&self, key: &ComponentKey) -> DiResult<Instance>;
}

/// Typed resolution helpers, available on every [`ResolverCore`].
///
/// # Examples
///
/// ```
/// use ferrous_inject::{ApplicationContext, Resolver};
///
/// let context = ApplicationContext::new();
/// context.bind::<usize>().singleton(42);
/// context.bind::<usize>().named("retries").singleton(3);
///
/// assert_eq!(*context.get_typed::<usize>().unwrap(), 42);
/// assert_eq!(*context.get_named::<usize>("retries").unwrap(), 3);
/// assert!(context.get_optional::<u8>().unwrap().is_none());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves the unqualified binding of `T`.
    fn get_typed<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        self.get_by_key(&ComponentKey::of::<T>())
    }

    /// Resolves the binding of `T` qualified by `name`.
    fn get_named<T: ?Sized + Send + Sync + 'static>(&self, name: &str) -> DiResult<Arc<T>> {
        self.get_by_key(&ComponentKey::named::<T>(name))
    }

    /// Resolves `key`, whose type must be `T`.
    fn get_by_key<T: ?Sized + Send + Sync + 'static>(&self, key: &ComponentKey) -> DiResult<Arc<T>> {
        self.resolve_component(key)?.try_downcast::<T>()
    }

    /// Like [`get_typed`](Self::get_typed), mapping "nothing bound" to `None`.
    ///
    /// Failures while producing a value still propagate.
    fn get_optional<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Option<Arc<T>>> {
        match self.get_typed::<T>() {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.is_unresolved() => Ok(None),
            Err(error) => Err(error),
        }
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
