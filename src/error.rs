//! Error types for binding resolution and component population.

use thiserror::Error;

/// Boxed error returned by user-supplied factories, constructors and
/// injection methods.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependency injection errors
///
/// Represents the failure conditions that can occur while declaring
/// qualifiers, resolving components from binding hierarchies, or populating
/// injection points on an existing instance.
///
/// Overwriting an occupied binding priority is *not* an error; it is reported
/// as a warning through `tracing`.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{ApplicationContext, ComponentKey, DiError};
///
/// let context = ApplicationContext::new();
/// match context.get(&ComponentKey::of::<String>()) {
///     Err(DiError::ComponentResolution { key }) => {
///         assert_eq!(key, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Error)]
pub enum DiError {
    /// Qualifier metadata keys do not match the attributes declared by the
    /// qualifier type.
    #[error("Invalid qualifier metadata for @{qualifier}: expected attributes {expected:?}, got {actual:?}")]
    InvalidQualifier {
        qualifier: &'static str,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    /// No compatible binding could produce a value for the key.
    #[error("No compatible binding found for {key}")]
    ComponentResolution { key: String },

    /// A provider failed while producing a value.
    #[error("Provider for {key} failed: {source}")]
    ProviderFailed {
        key: String,
        #[source]
        source: BoxError,
    },

    /// A required injection point could not be resolved.
    #[error("Required injection point {point} on {owner} could not be resolved: {source}")]
    ComponentRequired {
        point: String,
        owner: &'static str,
        #[source]
        source: Box<DiError>,
    },

    /// A required injection point resolved to no value.
    #[error("Injection point {point} on {owner} is required but no value was provided")]
    RequiredNotProvided { point: String, owner: &'static str },

    /// Applying resolved values to an injection point failed.
    #[error("Failed to populate {point} on {owner}: {source}")]
    ComponentPopulation {
        point: String,
        owner: &'static str,
        #[source]
        source: BoxError,
    },

    /// The number of resolved objects does not match the injection point.
    #[error("Injection point {point} expects {expected} value(s), got {actual}")]
    ArgumentCount {
        point: String,
        expected: usize,
        actual: usize,
    },

    /// A value could not be downcast to the expected type.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<String>),

    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
}

impl DiError {
    /// Whether this error means "nothing could be resolved" rather than a
    /// failure while producing a value.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, DiError::ComponentResolution { .. })
    }

    /// Follows `ComponentRequired` wrappers to the failure that caused them.
    pub fn root_cause(&self) -> &DiError {
        let mut current = self;
        while let DiError::ComponentRequired { source, .. } = current {
            current = source;
        }
        current
    }
}

/// Result type for DI operations
///
/// A convenience type alias for `Result<T, DiError>` used throughout
/// ferrous-inject.
pub type DiResult<T> = Result<T, DiError>;
