//! Discovery of injection points on component types.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{DiError, DiResult};
use crate::instance::Instance;
use crate::internal::KeyMap;
use crate::introspect::{Annotations, Arguments, FieldView, InjectionPoint, MethodView, PopulateType, TypeView};
use crate::key::TypeKey;

/// A settable location on a component: a field, or a method whose
/// parameters are resolved positionally.
#[derive(Debug, Clone)]
pub enum ComponentInjectionPoint {
    Field(FieldView),
    Method(MethodView),
}

/// Borrowed view of the member behind an injection point.
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'a> {
    Field(&'a FieldView),
    Method(&'a MethodView),
}

impl ComponentInjectionPoint {
    /// `Owner.member`, used in error messages.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.owner().name(), self.member_name())
    }

    pub fn member_name(&self) -> &'static str {
        match self {
            ComponentInjectionPoint::Field(field) => field.name(),
            ComponentInjectionPoint::Method(method) => method.name(),
        }
    }

    pub fn owner(&self) -> TypeKey {
        match self {
            ComponentInjectionPoint::Field(field) => field.owner(),
            ComponentInjectionPoint::Method(method) => method.owner(),
        }
    }

    /// Annotations of the member itself.
    pub fn annotations(&self) -> &Annotations {
        match self {
            ComponentInjectionPoint::Field(field) => field.annotations(),
            ComponentInjectionPoint::Method(method) => method.annotations(),
        }
    }

    /// One point for a field, one per parameter for a method.
    pub fn injection_points(&self) -> &[InjectionPoint] {
        match self {
            ComponentInjectionPoint::Field(field) => std::slice::from_ref(field.point()),
            ComponentInjectionPoint::Method(method) => method.parameters(),
        }
    }

    pub fn declaration(&self) -> Declaration<'_> {
        match self {
            ComponentInjectionPoint::Field(field) => Declaration::Field(field),
            ComponentInjectionPoint::Method(method) => Declaration::Method(method),
        }
    }

    pub fn is_field(&self) -> bool {
        matches!(self, ComponentInjectionPoint::Field(_))
    }

    /// Applies resolved values to `target`.
    ///
    /// Fields take exactly one value; collection fields append it to their
    /// current contents. Methods take one value per parameter.
    pub fn process_objects(
        &self,
        target: &mut dyn Any,
        mut objects: Vec<Option<Instance>>,
    ) -> DiResult<()> {
        let expected = self.injection_points().len();
        if objects.len() != expected {
            return Err(DiError::ArgumentCount {
                point: self.qualified_name(),
                expected,
                actual: objects.len(),
            });
        }
        let result = match self {
            ComponentInjectionPoint::Field(field) => field
                .set(target, objects.pop().flatten())
                .map_err(|e| Box::new(e) as crate::error::BoxError),
            ComponentInjectionPoint::Method(method) => {
                method.invoke(target, &Arguments::new(objects))
            }
        };
        result.map_err(|source| DiError::ComponentPopulation {
            point: self.qualified_name(),
            owner: self.owner().name(),
            source,
        })
    }
}

impl fmt::Display for ComponentInjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

/// Produces the ordered injection points of a type.
pub trait InjectionPointResolver: Send + Sync {
    fn resolve(&self, view: &TypeView) -> Arc<[ComponentInjectionPoint]>;
}

/// Selects members annotated `Inject`, filtered by the type's `Populate`
/// annotation (or the configured default). Fields come before methods, each
/// in declaration order.
///
/// ```rust
/// use ferrous_inject::{
///     AnnotatedInjectionPointResolver, FieldView, InjectionPointResolver, MethodView,
///     PopulateType, TypeView,
/// };
/// use std::sync::Arc;
///
/// struct Client {
///     retries: Option<Arc<u8>>,
///     timeout: Option<Arc<u64>>,
/// }
///
/// let view = TypeView::builder::<Client>()
///     .populate(PopulateType::Fields)
///     .field(FieldView::value::<Client, u8>("retries", |c| &mut c.retries).inject())
///     .field(FieldView::value::<Client, u64>("timeout", |c| &mut c.timeout))
///     .method(MethodView::new::<Client, _>("init", Vec::new(), |_, _| Ok(())).inject())
///     .build();
///
/// let points = AnnotatedInjectionPointResolver::default().resolve(&view);
/// assert_eq!(points.len(), 1);
/// assert_eq!(points[0].member_name(), "retries");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotatedInjectionPointResolver {
    default_populate: PopulateType,
}

impl AnnotatedInjectionPointResolver {
    pub fn new(default_populate: PopulateType) -> Self {
        Self { default_populate }
    }
}

impl InjectionPointResolver for AnnotatedInjectionPointResolver {
    fn resolve(&self, view: &TypeView) -> Arc<[ComponentInjectionPoint]> {
        let populate = view
            .annotations()
            .populate_type()
            .unwrap_or(self.default_populate);

        let fields = view
            .fields()
            .iter()
            .filter(|_| populate.allows_fields())
            .filter(|field| field.annotations().has_inject())
            .cloned()
            .map(ComponentInjectionPoint::Field);
        let methods = view
            .methods()
            .iter()
            .filter(|_| populate.allows_executables())
            .filter(|method| method.annotations().has_inject())
            .cloned()
            .map(ComponentInjectionPoint::Method);

        fields.chain(methods).collect()
    }
}

/// Caches another resolver's result per type.
pub struct CachingInjectionPointResolver<R> {
    inner: R,
    cache: RwLock<KeyMap<TypeId, Arc<[ComponentInjectionPoint]>>>,
}

impl<R: InjectionPointResolver> CachingInjectionPointResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: RwLock::new(KeyMap::default()),
        }
    }

    pub fn cached_types(&self) -> usize {
        self.cache.read().len()
    }
}

impl<R: InjectionPointResolver> InjectionPointResolver for CachingInjectionPointResolver<R> {
    fn resolve(&self, view: &TypeView) -> Arc<[ComponentInjectionPoint]> {
        let id = view.key().id();
        if let Some(points) = self.cache.read().get(&id) {
            return points.clone();
        }
        let points = self.inner.resolve(view);
        self.cache.write().entry(id).or_insert(points).clone()
    }
}

impl<R> fmt::Debug for CachingInjectionPointResolver<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingInjectionPointResolver")
            .field("cached_types", &self.cache.read().len())
            .finish()
    }
}
