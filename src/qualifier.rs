//! Qualifiers narrowing a contract key.
//!
//! A qualifier is either a plain name or a typed qualifier carrying
//! metadata. Typed qualifiers are validated against the attribute names their
//! [`QualifierType`] declares, mirroring how an annotation must supply every
//! attribute it declares and nothing else.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::error::{DiError, DiResult};

/// Annotation-like qualifier type: a name plus the attribute names every
/// instance of it must supply.
///
/// ```rust
/// use ferrous_inject::QualifierType;
///
/// const REGION: QualifierType = QualifierType::new("Region", &["value"]);
/// assert_eq!(REGION.attributes(), &["value"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifierType {
    name: &'static str,
    attributes: &'static [&'static str],
}

impl QualifierType {
    /// Declares a qualifier type.
    pub const fn new(name: &'static str, attributes: &'static [&'static str]) -> Self {
        Self { name, attributes }
    }

    /// Declares a qualifier type without attributes.
    pub const fn marker(name: &'static str) -> Self {
        Self { name, attributes: &[] }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn attributes(&self) -> &'static [&'static str] {
        self.attributes
    }
}

/// Metadata value carried by a typed qualifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetaValue {
    Str(String),
    Int(i64),
    Bool(bool),
    List(Vec<MetaValue>),
}

impl fmt::Display for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaValue::Str(s) => write!(f, "{s:?}"),
            MetaValue::Int(i) => write!(f, "{i}"),
            MetaValue::Bool(b) => write!(f, "{b}"),
            MetaValue::List(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::Str(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::Str(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        MetaValue::Int(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Bool(value)
    }
}

/// A typed qualifier with validated metadata.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{QualifierKey, QualifierType, DiError};
/// use std::collections::BTreeMap;
///
/// const REGION: QualifierType = QualifierType::new("Region", &["value"]);
///
/// assert!(matches!(
///     QualifierKey::new(REGION, BTreeMap::new()),
///     Err(DiError::InvalidQualifier { .. })
/// ));
///
/// let eu = QualifierKey::builder(REGION).with("value", "eu").build().unwrap();
/// assert_eq!(eu.to_string(), "@Region(value=\"eu\")");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QualifierKey {
    qualifier_type: QualifierType,
    meta: BTreeMap<String, MetaValue>,
}

impl QualifierKey {
    /// Creates a qualifier, failing when the metadata keys are not exactly the
    /// declared attribute names.
    pub fn new(qualifier_type: QualifierType, meta: BTreeMap<String, MetaValue>) -> DiResult<Self> {
        let expected: BTreeSet<&str> = qualifier_type.attributes.iter().copied().collect();
        let actual: BTreeSet<&str> = meta.keys().map(String::as_str).collect();
        if expected != actual {
            return Err(DiError::InvalidQualifier {
                qualifier: qualifier_type.name,
                expected: expected.into_iter().map(str::to_string).collect(),
                actual: actual.into_iter().map(str::to_string).collect(),
            });
        }
        Ok(Self { qualifier_type, meta })
    }

    /// Creates an attribute-less qualifier.
    pub fn marker(qualifier_type: QualifierType) -> DiResult<Self> {
        Self::new(qualifier_type, BTreeMap::new())
    }

    pub fn builder(qualifier_type: QualifierType) -> QualifierKeyBuilder {
        QualifierKeyBuilder {
            qualifier_type,
            meta: BTreeMap::new(),
        }
    }

    pub fn qualifier_type(&self) -> QualifierType {
        self.qualifier_type
    }

    pub fn meta(&self) -> &BTreeMap<String, MetaValue> {
        &self.meta
    }

    pub fn get(&self, attribute: &str) -> Option<&MetaValue> {
        self.meta.get(attribute)
    }
}

impl fmt::Display for QualifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.qualifier_type.name)?;
        if self.meta.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (i, (name, value)) in self.meta.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str(")")
    }
}

/// Builder collecting qualifier metadata before validation.
#[derive(Debug, Clone)]
pub struct QualifierKeyBuilder {
    qualifier_type: QualifierType,
    meta: BTreeMap<String, MetaValue>,
}

impl QualifierKeyBuilder {
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.meta.insert(attribute.into(), value.into());
        self
    }

    pub fn build(self) -> DiResult<QualifierKey> {
        QualifierKey::new(self.qualifier_type, self.meta)
    }
}

/// A single discriminator on a component key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Qualifier {
    /// Plain name qualifier
    Named(String),
    /// Typed qualifier with metadata
    Typed(QualifierKey),
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qualifier::Named(name) => write!(f, "name={name:?}"),
            Qualifier::Typed(key) => write!(f, "{key}"),
        }
    }
}

/// Set of qualifiers attached to a component key.
///
/// Two composites are equal when they hold the same qualifiers, regardless of
/// the order they were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompositeQualifier {
    qualifiers: BTreeSet<Qualifier>,
}

impl CompositeQualifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a qualifier. A key carries at most one name, so a name
    /// qualifier replaces any earlier one.
    pub fn insert(&mut self, qualifier: Qualifier) {
        if matches!(qualifier, Qualifier::Named(_)) {
            self.qualifiers.retain(|q| !matches!(q, Qualifier::Named(_)));
        }
        self.qualifiers.insert(qualifier);
    }

    pub fn with(mut self, qualifier: Qualifier) -> Self {
        self.insert(qualifier);
        self
    }

    /// The name qualifier, if present.
    pub fn name(&self) -> Option<&str> {
        self.qualifiers.iter().find_map(|q| match q {
            Qualifier::Named(name) => Some(name.as_str()),
            Qualifier::Typed(_) => None,
        })
    }

    pub fn typed(&self) -> impl Iterator<Item = &QualifierKey> {
        self.qualifiers.iter().filter_map(|q| match q {
            Qualifier::Typed(key) => Some(key),
            Qualifier::Named(_) => None,
        })
    }

    pub fn contains(&self, qualifier: &Qualifier) -> bool {
        self.qualifiers.contains(qualifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Qualifier> {
        self.qualifiers.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.qualifiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.qualifiers.len()
    }
}

impl fmt::Display for CompositeQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, qualifier) in self.qualifiers.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{qualifier}")?;
        }
        Ok(())
    }
}
