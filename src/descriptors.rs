//! Binding descriptors for introspection and diagnostics.

use crate::key::ComponentKeyView;
use crate::provider::ProviderKind;

/// One hierarchy entry, as reported by
/// [`ApplicationContext::binding_descriptors`](crate::ApplicationContext::binding_descriptors).
///
/// `provider` is the kind of the registered provider; `concrete` is the kind
/// found after unwrapping composed providers, which is what actually builds
/// the value.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{ApplicationContext, Lifetime, ProviderKind};
/// use std::sync::Arc;
///
/// let context = ApplicationContext::new();
/// context.bind::<u32>().singleton(8080);
/// context.bind::<u16>()
///     .named("port")
///     .priority(3)
///     .lifetime(Lifetime::Singleton)
///     .supplier(|| Ok(Arc::new(443)));
///
/// let descriptors = context.binding_descriptors();
/// assert_eq!(descriptors.len(), 2);
///
/// let port = descriptors.iter().find(|d| d.is_named()).unwrap();
/// assert_eq!(port.name(), Some("port"));
/// assert_eq!(port.priority, 3);
/// assert_eq!(port.provider, ProviderKind::Singleton);
/// assert_eq!(port.concrete, ProviderKind::Supplier);
/// assert!(port.is_composed());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDescriptor {
    /// Hierarchy key (type and qualifiers)
    pub key: ComponentKeyView,
    pub priority: i32,
    /// Kind of the registered provider
    pub provider: ProviderKind,
    /// Kind of the innermost provider
    pub concrete: ProviderKind,
}

impl BindingDescriptor {
    pub fn type_name(&self) -> &'static str {
        self.key.type_key().name()
    }

    pub fn name(&self) -> Option<&str> {
        self.key.qualifier().name()
    }

    pub fn is_named(&self) -> bool {
        self.name().is_some()
    }

    /// Whether the registered provider wraps another one.
    pub fn is_composed(&self) -> bool {
        self.provider != self.concrete
    }
}
