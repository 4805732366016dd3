//! Explicit annotation values attached to types and members.

use crate::qualifier::QualifierKey;

/// Which injection point kinds a component allows to be populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "config", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum PopulateType {
    /// Fields only
    Fields,
    /// Methods only
    Executables,
    /// Fields and methods
    #[default]
    All,
}

impl PopulateType {
    pub fn allows_fields(self) -> bool {
        matches!(self, PopulateType::Fields | PopulateType::All)
    }

    pub fn allows_executables(self) -> bool {
        matches!(self, PopulateType::Executables | PopulateType::All)
    }
}

/// Metadata marker on a type, constructor, field, method or parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Member takes part in injection
    Inject,
    /// Name qualifier for the injected value
    Named(String),
    /// Typed qualifier for the injected value
    Qualifier(QualifierKey),
    /// Explicit required-ness; absent means required
    Required(bool),
    /// Constructor participates in bound factory resolution
    Bound,
    /// Restricts which injection points a type allows
    Populate(PopulateType),
    /// Value comes from the application's named context store
    Context,
    /// Free-form marker for custom strategies and rules
    Marker(&'static str),
}

/// Ordered annotation list with typed queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    values: Vec<Annotation>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, annotation: Annotation) {
        self.values.push(annotation);
    }

    pub fn contains(&self, annotation: &Annotation) -> bool {
        self.values.contains(annotation)
    }

    pub fn has_inject(&self) -> bool {
        self.contains(&Annotation::Inject)
    }

    pub fn has_context(&self) -> bool {
        self.contains(&Annotation::Context)
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.values
            .iter()
            .any(|a| matches!(a, Annotation::Marker(m) if *m == marker))
    }

    /// Last explicit `Required` value, if any.
    pub fn required(&self) -> Option<bool> {
        self.values.iter().rev().find_map(|a| match a {
            Annotation::Required(required) => Some(*required),
            _ => None,
        })
    }

    pub fn populate_type(&self) -> Option<PopulateType> {
        self.values.iter().rev().find_map(|a| match a {
            Annotation::Populate(populate) => Some(*populate),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.values.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<Annotation> for Annotations {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
