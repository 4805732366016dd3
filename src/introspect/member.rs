//! Constructor, field and method views with checked invocation.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{BoxError, DiError, DiResult};
use crate::instance::Instance;
use crate::introspect::annotation::{Annotation, Annotations};
use crate::key::{ComponentKey, TypeKey};
use crate::qualifier::QualifierKey;

/// A single value slot to resolve: a field, or one parameter of a
/// constructor or method.
///
/// ```rust
/// use ferrous_inject::InjectionPoint;
///
/// let point = InjectionPoint::of::<u16>("port").named("http").optional();
/// assert_eq!(point.key().name(), Some("http"));
/// assert_eq!(point.annotations().required(), Some(false));
/// ```
#[derive(Debug, Clone)]
pub struct InjectionPoint {
    name: String,
    key: ComponentKey,
    annotations: Annotations,
}

impl InjectionPoint {
    pub fn of<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: ComponentKey::of::<T>(),
            annotations: Annotations::new(),
        }
    }

    /// Point with an explicit key.
    pub fn with_key(name: impl Into<String>, key: ComponentKey) -> Self {
        Self {
            name: name.into(),
            key,
            annotations: Annotations::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.key = self.key.to_builder().name(name.clone()).build();
        self.annotations.push(Annotation::Named(name));
        self
    }

    pub fn qualified(mut self, qualifier: QualifierKey) -> Self {
        self.key = self.key.to_builder().qualifier(qualifier.clone()).build();
        self.annotations.push(Annotation::Qualifier(qualifier));
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.key = self.key.to_builder().strict(strict).build();
        self
    }

    pub fn install_if_absent(mut self) -> Self {
        self.key = self.key.to_builder().install_if_absent().build();
        self
    }

    pub fn optional(self) -> Self {
        self.annotate(Annotation::Required(false))
    }

    pub fn required(self) -> Self {
        self.annotate(Annotation::Required(true))
    }

    /// Resolve from the named context store instead of the bindings.
    pub fn context(self) -> Self {
        self.annotate(Annotation::Context)
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &ComponentKey {
        &self.key
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

/// Positional values resolved for a constructor or method.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: Vec<Option<Instance>>,
}

impl Arguments {
    pub fn new(values: Vec<Option<Instance>>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn instance(&self, index: usize) -> Option<&Instance> {
        self.values.get(index).and_then(Option::as_ref)
    }

    pub fn values(&self) -> &[Option<Instance>] {
        &self.values
    }

    /// Typed value at `index`; `None` when absent or of another type.
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self, index: usize) -> Option<Arc<T>> {
        self.instance(index)?.downcast::<T>()
    }

    /// Typed value at `index`, failing when absent or of another type.
    pub fn required<T: ?Sized + Send + Sync + 'static>(&self, index: usize) -> DiResult<Arc<T>> {
        match self.instance(index) {
            Some(instance) => instance.try_downcast::<T>(),
            None => Err(DiError::RequiredNotProvided {
                point: format!("argument #{index}"),
                owner: std::any::type_name::<T>(),
            }),
        }
    }
}

type ConstructFn = Arc<dyn Fn(&Arguments) -> Result<Box<dyn Any + Send>, BoxError> + Send + Sync>;

/// A way to build a value of its owner type.
#[derive(Clone)]
pub struct ConstructorView {
    owner: TypeKey,
    parameters: Vec<InjectionPoint>,
    annotations: Annotations,
    construct: ConstructFn,
}

impl ConstructorView {
    /// Constructor taking the given parameters.
    pub fn new<T, F>(parameters: Vec<InjectionPoint>, construct: F) -> Self
    where
        T: Send + 'static,
        F: Fn(&Arguments) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self {
            owner: TypeKey::of::<T>(),
            parameters,
            annotations: Annotations::new(),
            construct: Arc::new(move |args: &Arguments| -> Result<Box<dyn Any + Send>, BoxError> {
                let value = construct(args)?;
                Ok(Box::new(value) as Box<dyn Any + Send>)
            }),
        }
    }

    /// No-argument constructor backed by `Default`.
    pub fn default_for<T: Default + Send + 'static>() -> Self {
        Self::new(Vec::new(), |_| Ok(T::default()))
    }

    /// Marks the constructor as a candidate for context-driven construction.
    pub fn injectable(self) -> Self {
        self.annotate(Annotation::Inject)
    }

    /// Marks the constructor as a candidate for bound factory construction.
    pub fn bound(self) -> Self {
        self.annotate(Annotation::Bound)
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn owner(&self) -> TypeKey {
        self.owner
    }

    pub fn parameters(&self) -> &[InjectionPoint] {
        &self.parameters
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn is_injectable(&self) -> bool {
        self.annotations.has_inject()
    }

    pub fn is_bound(&self) -> bool {
        self.annotations.contains(&Annotation::Bound)
    }

    /// A plain no-argument constructor that is not marked injectable.
    pub fn is_default(&self) -> bool {
        self.parameters.is_empty() && !self.is_injectable()
    }

    /// Invokes the constructor with exactly one value per parameter.
    pub fn invoke(&self, args: &Arguments) -> Result<Box<dyn Any + Send>, BoxError> {
        if args.len() != self.parameters.len() {
            return Err(Box::new(DiError::ArgumentCount {
                point: format!("{}::new", self.owner),
                expected: self.parameters.len(),
                actual: args.len(),
            }));
        }
        (self.construct)(args)
    }
}

impl fmt::Debug for ConstructorView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorView")
            .field("owner", &self.owner.name())
            .field("parameters", &self.parameters)
            .field("annotations", &self.annotations)
            .finish()
    }
}

type ApplyFn = Arc<dyn Fn(&mut dyn Any, Option<Instance>) -> DiResult<()> + Send + Sync>;

/// A settable field on a component.
///
/// Value fields are `Option<Arc<V>>` and are set on injection; an absent
/// optional value leaves them untouched. Collection fields are `Vec<E>` and
/// the resolved collection is appended to whatever the field already holds.
#[derive(Clone)]
pub struct FieldView {
    owner: TypeKey,
    name: &'static str,
    point: InjectionPoint,
    annotations: Annotations,
    collection: bool,
    apply: ApplyFn,
}

impl FieldView {
    /// Field of type `Option<Arc<V>>`.
    pub fn value<O, V>(name: &'static str, accessor: fn(&mut O) -> &mut Option<Arc<V>>) -> Self
    where
        O: 'static,
        V: ?Sized + Send + Sync + 'static,
    {
        Self {
            owner: TypeKey::of::<O>(),
            name,
            point: InjectionPoint::of::<V>(name),
            annotations: Annotations::new(),
            collection: false,
            apply: Arc::new(move |target: &mut dyn Any, value: Option<Instance>| -> DiResult<()> {
                let owner = downcast_owner::<O>(target)?;
                if let Some(instance) = value {
                    *accessor(owner) = Some(instance.try_downcast::<V>()?);
                }
                Ok(())
            }),
        }
    }

    /// Field of type `Vec<E>`, resolved through a `Vec<E>` binding.
    pub fn collection<O, E>(name: &'static str, accessor: fn(&mut O) -> &mut Vec<E>) -> Self
    where
        O: 'static,
        E: Clone + Send + Sync + 'static,
    {
        Self {
            owner: TypeKey::of::<O>(),
            name,
            point: InjectionPoint::of::<Vec<E>>(name),
            annotations: Annotations::new(),
            collection: true,
            apply: Arc::new(move |target: &mut dyn Any, value: Option<Instance>| -> DiResult<()> {
                let owner = downcast_owner::<O>(target)?;
                if let Some(instance) = value {
                    let values = instance.try_downcast::<Vec<E>>()?;
                    accessor(owner).extend(values.iter().cloned());
                }
                Ok(())
            }),
        }
    }

    pub fn inject(self) -> Self {
        self.annotate(Annotation::Inject)
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.point = self.point.named(name);
        self
    }

    pub fn qualified(mut self, qualifier: QualifierKey) -> Self {
        self.point = self.point.qualified(qualifier);
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.point = self.point.strict(strict);
        self
    }

    pub fn optional(mut self) -> Self {
        self.point = self.point.optional();
        self
    }

    pub fn context(mut self) -> Self {
        self.point = self.point.context();
        self
    }

    pub fn install_if_absent(mut self) -> Self {
        self.point = self.point.install_if_absent();
        self
    }

    pub fn owner(&self) -> TypeKey {
        self.owner
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn point(&self) -> &InjectionPoint {
        &self.point
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn is_collection(&self) -> bool {
        self.collection
    }

    /// Writes a resolved value into the field.
    pub fn set(&self, target: &mut dyn Any, value: Option<Instance>) -> DiResult<()> {
        (self.apply)(target, value)
    }
}

impl fmt::Debug for FieldView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldView")
            .field("owner", &self.owner.name())
            .field("name", &self.name)
            .field("point", &self.point)
            .field("collection", &self.collection)
            .finish()
    }
}

type InvokeFn = Arc<dyn Fn(&mut dyn Any, &Arguments) -> Result<(), BoxError> + Send + Sync>;

/// An injection method on a component; parameters are resolved positionally.
#[derive(Clone)]
pub struct MethodView {
    owner: TypeKey,
    name: &'static str,
    parameters: Vec<InjectionPoint>,
    annotations: Annotations,
    invoke: InvokeFn,
}

impl MethodView {
    pub fn new<O, F>(name: &'static str, parameters: Vec<InjectionPoint>, invoke: F) -> Self
    where
        O: 'static,
        F: Fn(&mut O, &Arguments) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self {
            owner: TypeKey::of::<O>(),
            name,
            parameters,
            annotations: Annotations::new(),
            invoke: Arc::new(move |target: &mut dyn Any, args: &Arguments| -> Result<(), BoxError> {
                let owner = downcast_owner::<O>(target)?;
                invoke(owner, args)
            }),
        }
    }

    pub fn inject(self) -> Self {
        self.annotate(Annotation::Inject)
    }

    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn owner(&self) -> TypeKey {
        self.owner
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parameters(&self) -> &[InjectionPoint] {
        &self.parameters
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn invoke(&self, target: &mut dyn Any, args: &Arguments) -> Result<(), BoxError> {
        (self.invoke)(target, args)
    }
}

impl fmt::Debug for MethodView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodView")
            .field("owner", &self.owner.name())
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish()
    }
}

fn downcast_owner<O: 'static>(target: &mut dyn Any) -> DiResult<&mut O> {
    target.downcast_mut::<O>().ok_or(DiError::TypeMismatch {
        expected: std::any::type_name::<O>(),
        found: "unrelated component type",
    })
}
