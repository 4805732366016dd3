//! Compile-time type descriptors.
//!
//! Components describe their constructors, injectable fields and methods, and
//! the contracts they can be viewed as, through a [`TypeView`] registered in
//! the application's [`TypeRegistry`]. Nothing here relies on runtime
//! reflection; every accessor is an ordinary closure or function pointer.
//!
//! # Examples
//!
//! ```rust
//! use ferrous_inject::{ConstructorView, FieldView, InjectionPoint, TypeView};
//! use std::sync::Arc;
//!
//! trait Store: Send + Sync {}
//!
//! #[derive(Default)]
//! struct Database;
//! impl Store for Database {}
//!
//! struct Repository {
//!     db: Option<Arc<Database>>,
//! }
//!
//! let database = TypeView::builder::<Database>()
//!     .default_constructor()
//!     .implements::<dyn Store>(|db| db as Arc<dyn Store>)
//!     .build();
//! assert_eq!(database.supertypes().len(), 1);
//!
//! let repository = TypeView::builder::<Repository>()
//!     .constructor(ConstructorView::new(Vec::new(), |_| Ok(Repository { db: None })))
//!     .field(FieldView::value::<Repository, Database>("db", |r| &mut r.db).inject())
//!     .build();
//! assert_eq!(repository.fields().len(), 1);
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::instance::Instance;
use crate::internal::KeyMap;
use crate::key::TypeKey;

pub mod annotation;
pub mod member;

pub use annotation::{Annotation, Annotations, PopulateType};
pub use member::{Arguments, ConstructorView, FieldView, InjectionPoint, MethodView};

type UpcastFn = Arc<dyn Fn(&Instance) -> Option<Instance> + Send + Sync>;
type FinishFn = Arc<dyn Fn(Box<dyn Any + Send>) -> Option<Instance> + Send + Sync>;

/// A contract the described type can be viewed as.
#[derive(Clone)]
pub struct Supertype {
    key: TypeKey,
    upcast: UpcastFn,
}

impl Supertype {
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Converts an instance of the described type into the supertype.
    pub fn upcast(&self, instance: &Instance) -> Option<Instance> {
        (self.upcast)(instance)
    }
}

impl fmt::Debug for Supertype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Supertype").field(&self.key.name()).finish()
    }
}

/// Structural facts about one component type.
#[derive(Clone)]
pub struct TypeView {
    key: TypeKey,
    annotations: Annotations,
    constructors: Vec<ConstructorView>,
    fields: Vec<FieldView>,
    methods: Vec<MethodView>,
    supertypes: Vec<Supertype>,
    finish: FinishFn,
}

impl TypeView {
    pub fn builder<T: Send + Sync + 'static>() -> TypeViewBuilder<T> {
        TypeViewBuilder {
            annotations: Annotations::new(),
            constructors: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            supertypes: Vec::new(),
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn constructors(&self) -> &[ConstructorView] {
        &self.constructors
    }

    pub fn injectable_constructors(&self) -> impl Iterator<Item = &ConstructorView> {
        self.constructors.iter().filter(|c| c.is_injectable())
    }

    pub fn bound_constructors(&self) -> impl Iterator<Item = &ConstructorView> {
        self.constructors.iter().filter(|c| c.is_bound())
    }

    pub fn default_constructor(&self) -> Option<&ConstructorView> {
        self.constructors.iter().find(|c| c.is_default())
    }

    pub fn fields(&self) -> &[FieldView] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodView] {
        &self.methods
    }

    pub fn supertypes(&self) -> &[Supertype] {
        &self.supertypes
    }

    /// Whether a value of this type satisfies `target`.
    pub fn is_assignable_to(&self, target: TypeKey) -> bool {
        self.key == target || self.supertypes.iter().any(|s| s.key == target)
    }

    /// Views `instance` (of this type) as `target`.
    pub fn upcast(&self, instance: &Instance, target: TypeKey) -> Option<Instance> {
        if instance.type_key() == target {
            return Some(instance.clone());
        }
        self.supertypes
            .iter()
            .find(|s| s.key == target)
            .and_then(|s| s.upcast(instance))
    }

    /// Moves a freshly constructed value into a shared [`Instance`].
    pub fn finish(&self, value: Box<dyn Any + Send>) -> Option<Instance> {
        (self.finish)(value)
    }
}

impl fmt::Debug for TypeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeView")
            .field("type", &self.key.name())
            .field("annotations", &self.annotations)
            .field("constructors", &self.constructors)
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .field("supertypes", &self.supertypes)
            .finish()
    }
}

/// Typed builder for [`TypeView`].
pub struct TypeViewBuilder<T> {
    annotations: Annotations,
    constructors: Vec<ConstructorView>,
    fields: Vec<FieldView>,
    methods: Vec<MethodView>,
    supertypes: Vec<Supertype>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> TypeViewBuilder<T> {
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Restricts which injection points population may touch.
    pub fn populate(self, populate: PopulateType) -> Self {
        self.annotate(Annotation::Populate(populate))
    }

    pub fn constructor(mut self, constructor: ConstructorView) -> Self {
        debug_assert_eq!(constructor.owner(), TypeKey::of::<T>());
        self.constructors.push(constructor);
        self
    }

    pub fn default_constructor(self) -> Self
    where
        T: Default,
    {
        self.constructor(ConstructorView::default_for::<T>())
    }

    pub fn field(mut self, field: FieldView) -> Self {
        debug_assert_eq!(field.owner(), TypeKey::of::<T>());
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodView) -> Self {
        debug_assert_eq!(method.owner(), TypeKey::of::<T>());
        self.methods.push(method);
        self
    }

    /// Declares that `T` can be viewed as `U`.
    pub fn implements<U>(mut self, cast: fn(Arc<T>) -> Arc<U>) -> Self
    where
        U: ?Sized + Send + Sync + 'static,
    {
        self.supertypes.push(Supertype {
            key: TypeKey::of::<U>(),
            upcast: Arc::new(move |instance: &Instance| -> Option<Instance> {
                instance.downcast::<T>().map(|value| Instance::new(cast(value)))
            }),
        });
        self
    }

    pub fn build(self) -> TypeView {
        TypeView {
            key: TypeKey::of::<T>(),
            annotations: self.annotations,
            constructors: self.constructors,
            fields: self.fields,
            methods: self.methods,
            supertypes: self.supertypes,
            finish: Arc::new(|value: Box<dyn Any + Send>| -> Option<Instance> {
                value
                    .downcast::<T>()
                    .ok()
                    .map(|value| Instance::new(Arc::<T>::from(value)))
            }),
        }
    }
}

/// Thread-safe table of type descriptors, keyed by `TypeId`.
#[derive(Default)]
pub struct TypeRegistry {
    views: RwLock<KeyMap<TypeId, Arc<TypeView>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the descriptor for its type.
    pub fn register(&self, view: TypeView) -> Arc<TypeView> {
        let view = Arc::new(view);
        self.views.write().insert(view.key().id(), view.clone());
        view
    }

    pub fn get(&self, key: TypeKey) -> Option<Arc<TypeView>> {
        self.get_by_id(key.id())
    }

    pub fn get_by_id(&self, id: TypeId) -> Option<Arc<TypeView>> {
        self.views.read().get(&id).cloned()
    }

    pub fn contains(&self, key: TypeKey) -> bool {
        self.views.read().contains_key(&key.id())
    }

    pub fn len(&self) -> usize {
        self.views.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.read().is_empty()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.len())
            .finish()
    }
}
