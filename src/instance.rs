//! Type-erased component handles.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::DiError;
use crate::key::TypeKey;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// A shared, type-erased component instance.
///
/// The handle stores an `Arc<T>` inside an `Arc<dyn Any>`, so the contract
/// type may be a trait object as well as a concrete type. Cloning is cheap
/// and preserves identity.
///
/// ```rust
/// use ferrous_inject::Instance;
/// use std::sync::Arc;
///
/// trait Named: Send + Sync { fn name(&self) -> &str; }
/// struct Thing;
/// impl Named for Thing { fn name(&self) -> &str { "thing" } }
///
/// let instance = Instance::new(Arc::new(Thing) as Arc<dyn Named>);
/// let named = instance.downcast::<dyn Named>().unwrap();
/// assert_eq!(named.name(), "thing");
/// assert!(instance.downcast::<Thing>().is_none());
/// ```
#[derive(Clone)]
pub struct Instance {
    value: AnyArc,
    type_key: TypeKey,
}

impl Instance {
    /// Wraps a shared value.
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            value: Arc::new(value),
            type_key: TypeKey::of::<T>(),
        }
    }

    /// Wraps an owned value.
    pub fn of<T: Send + Sync + 'static>(value: T) -> Self {
        Self::new(Arc::new(value))
    }

    /// Recovers the typed `Arc`, or `None` when the stored type differs.
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.value.downcast_ref::<Arc<T>>().cloned()
    }

    /// Like [`downcast`](Self::downcast) but reports a `TypeMismatch`.
    pub fn try_downcast<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>, DiError> {
        self.downcast::<T>().ok_or_else(|| DiError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            found: self.type_key.name(),
        })
    }

    /// The contract type the value was stored as.
    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.type_key == TypeKey::of::<T>()
    }

    /// Whether both handles refer to the same stored value.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_key.name())
            .finish()
    }
}
