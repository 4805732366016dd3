//! Component key types for binding lookup.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::qualifier::{CompositeQualifier, Qualifier, QualifierKey};

/// Contract type descriptor: a `TypeId` plus its name for diagnostics.
///
/// Works for sized types and for trait objects (`dyn Trait`) alike.
///
/// ```rust
/// use ferrous_inject::TypeKey;
///
/// trait Greeter {}
///
/// let key = TypeKey::of::<dyn Greeter>();
/// assert!(key.name().contains("Greeter"));
/// assert_eq!(key, TypeKey::of::<dyn Greeter>());
/// assert_ne!(key, TypeKey::of::<String>());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

// TypeId-only comparison; the name is diagnostics only
impl PartialEq for TypeKey {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for TypeKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Whether resolution requires an exact key match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strictness {
    /// Exact type match only
    Strict,
    /// Fall back to bindings whose type declares the requested type as a
    /// supertype
    Loose,
    /// Defer to the context's configured strict mode
    #[default]
    Undefined,
}

impl Strictness {
    /// Resolves `Undefined` against the environment's global setting.
    pub fn is_strict(self, global_strict_mode: bool) -> bool {
        match self {
            Strictness::Strict => true,
            Strictness::Loose => false,
            Strictness::Undefined => global_strict_mode,
        }
    }
}

impl From<bool> for Strictness {
    fn from(strict: bool) -> Self {
        if strict {
            Strictness::Strict
        } else {
            Strictness::Loose
        }
    }
}

/// Identity of a binding hierarchy: contract type plus qualifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKeyView {
    type_key: TypeKey,
    qualifier: CompositeQualifier,
}

impl ComponentKeyView {
    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    pub fn qualifier(&self) -> &CompositeQualifier {
        &self.qualifier
    }
}

impl fmt::Display for ComponentKeyView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.qualifier.is_empty() {
            write!(f, "{}", self.type_key)
        } else {
            write!(f, "{}[{}]", self.type_key, self.qualifier)
        }
    }
}

/// Key for binding lookup and component resolution.
///
/// Keys are immutable once built. Equality and hashing consider the type and
/// the full qualifier set only; strictness and the install-if-absent marker
/// influence resolution behaviour, not identity.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{ComponentKey, Strictness};
///
/// let plain = ComponentKey::of::<u32>();
/// let strict = ComponentKey::builder::<u32>().strict(true).build();
/// let named = ComponentKey::named::<u32>("port");
///
/// assert_eq!(plain, strict);
/// assert_ne!(plain, named);
/// assert_eq!(strict.strictness(), Strictness::Strict);
/// assert_eq!(named.name(), Some("port"));
/// ```
#[derive(Debug, Clone)]
pub struct ComponentKey {
    type_key: TypeKey,
    qualifier: CompositeQualifier,
    strictness: Strictness,
    install_if_absent: bool,
}

impl ComponentKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::builder::<T>().build()
    }

    pub fn named<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::builder::<T>().name(name).build()
    }

    pub fn builder<T: ?Sized + 'static>() -> ComponentKeyBuilder {
        ComponentKeyBuilder::new(TypeKey::of::<T>())
    }

    /// Builder starting from an already-known type key.
    pub fn builder_for(type_key: TypeKey) -> ComponentKeyBuilder {
        ComponentKeyBuilder::new(type_key)
    }

    /// Builder pre-filled with this key's attributes.
    pub fn to_builder(&self) -> ComponentKeyBuilder {
        ComponentKeyBuilder {
            type_key: self.type_key,
            qualifier: self.qualifier.clone(),
            strictness: self.strictness,
            install_if_absent: self.install_if_absent,
        }
    }

    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    pub fn qualifier(&self) -> &CompositeQualifier {
        &self.qualifier
    }

    pub fn name(&self) -> Option<&str> {
        self.qualifier.name()
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    pub fn install_if_absent(&self) -> bool {
        self.install_if_absent
    }

    /// The (type, qualifier) view used for hierarchy lookup.
    pub fn view(&self) -> ComponentKeyView {
        ComponentKeyView {
            type_key: self.type_key,
            qualifier: self.qualifier.clone(),
        }
    }
}

impl PartialEq for ComponentKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_key == other.type_key && self.qualifier == other.qualifier
    }
}

impl Eq for ComponentKey {}

impl Hash for ComponentKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_key.hash(state);
        self.qualifier.hash(state);
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.qualifier.is_empty() {
            write!(f, "{}", self.type_key)
        } else {
            write!(f, "{}[{}]", self.type_key, self.qualifier)
        }
    }
}

impl From<&ComponentKey> for ComponentKeyView {
    fn from(key: &ComponentKey) -> Self {
        key.view()
    }
}

/// Builder for [`ComponentKey`].
#[derive(Debug, Clone)]
pub struct ComponentKeyBuilder {
    type_key: TypeKey,
    qualifier: CompositeQualifier,
    strictness: Strictness,
    install_if_absent: bool,
}

impl ComponentKeyBuilder {
    fn new(type_key: TypeKey) -> Self {
        Self {
            type_key,
            qualifier: CompositeQualifier::new(),
            strictness: Strictness::Undefined,
            install_if_absent: false,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.qualifier.insert(Qualifier::Named(name.into()));
        self
    }

    pub fn qualifier(mut self, qualifier: QualifierKey) -> Self {
        self.qualifier.insert(Qualifier::Typed(qualifier));
        self
    }

    pub fn qualifiers(mut self, qualifier: CompositeQualifier) -> Self {
        for q in qualifier.iter() {
            self.qualifier.insert(q.clone());
        }
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strictness = Strictness::from(strict);
        self
    }

    pub fn strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Create the binding hierarchy on first lookup when none exists.
    pub fn install_if_absent(mut self) -> Self {
        self.install_if_absent = true;
        self
    }

    pub fn build(self) -> ComponentKey {
        ComponentKey {
            type_key: self.type_key,
            qualifier: self.qualifier,
            strictness: self.strictness,
            install_if_absent: self.install_if_absent,
        }
    }
}
