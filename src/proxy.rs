//! Proxy unwrapping.
//!
//! Population writes into the object that actually holds component state.
//! When a component is wrapped in a proxy, the [`ProxyOrchestrator`] exposes
//! the backing delegate so it can be populated in place; the proxy itself is
//! never replaced.
//!
//! # Examples
//!
//! ```rust
//! use ferrous_inject::{Proxy, ProxyOrchestrator, ProxyRegistry};
//!
//! struct Service {
//!     calls: u32,
//! }
//!
//! struct Counted {
//!     delegate: Option<Service>,
//! }
//!
//! impl Proxy for Counted {
//!     type Target = Service;
//!
//!     fn delegate(&self) -> Option<&Service> {
//!         self.delegate.as_ref()
//!     }
//!
//!     fn delegate_mut(&mut self) -> Option<&mut Service> {
//!         self.delegate.as_mut()
//!     }
//! }
//!
//! let registry = ProxyRegistry::new();
//! registry.register::<Counted>();
//!
//! let mut proxy = Counted { delegate: Some(Service { calls: 0 }) };
//! assert!(registry.is_proxy(&proxy));
//!
//! let delegate = registry.delegate_mut(&mut proxy).unwrap();
//! delegate.downcast_mut::<Service>().unwrap().calls += 1;
//! assert_eq!(proxy.delegate.unwrap().calls, 1);
//! ```

use std::any::{Any, TypeId};
use std::fmt;

use parking_lot::RwLock;

use crate::internal::KeyMap;

/// A wrapper type standing in front of a delegate component.
pub trait Proxy: Send + Sync + 'static {
    type Target: Send + Sync + 'static;

    fn delegate(&self) -> Option<&Self::Target>;

    fn delegate_mut(&mut self) -> Option<&mut Self::Target>;
}

/// Capability to recognise proxies and reach their delegates.
pub trait ProxyOrchestrator: Send + Sync {
    fn is_proxy(&self, instance: &dyn Any) -> bool;

    fn delegate<'a>(&self, instance: &'a dyn Any) -> Option<&'a dyn Any>;

    fn delegate_mut<'a>(&self, instance: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

type DelegateFn = for<'a> fn(&'a dyn Any) -> Option<&'a dyn Any>;
type DelegateMutFn = for<'a> fn(&'a mut dyn Any) -> Option<&'a mut dyn Any>;

#[derive(Clone, Copy)]
struct ProxyEntry {
    name: &'static str,
    delegate: DelegateFn,
    delegate_mut: DelegateMutFn,
}

fn delegate_of<P: Proxy>(instance: &dyn Any) -> Option<&dyn Any> {
    let target = instance.downcast_ref::<P>()?.delegate()?;
    Some(target as &dyn Any)
}

fn delegate_mut_of<P: Proxy>(instance: &mut dyn Any) -> Option<&mut dyn Any> {
    let target = instance.downcast_mut::<P>()?.delegate_mut()?;
    Some(target as &mut dyn Any)
}

/// [`ProxyOrchestrator`] backed by an explicit table of proxy types.
#[derive(Default)]
pub struct ProxyRegistry {
    entries: RwLock<KeyMap<TypeId, ProxyEntry>>,
}

impl ProxyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<P: Proxy>(&self) {
        self.entries.write().insert(
            TypeId::of::<P>(),
            ProxyEntry {
                name: std::any::type_name::<P>(),
                delegate: delegate_of::<P>,
                delegate_mut: delegate_mut_of::<P>,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    fn entry(&self, instance: &dyn Any) -> Option<ProxyEntry> {
        self.entries.read().get(&instance.type_id()).copied()
    }
}

impl ProxyOrchestrator for ProxyRegistry {
    fn is_proxy(&self, instance: &dyn Any) -> bool {
        self.entry(instance).is_some()
    }

    fn delegate<'a>(&self, instance: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.entry(instance)?.delegate)(instance)
    }

    fn delegate_mut<'a>(&self, instance: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let entry = self.entry(&*instance)?;
        (entry.delegate_mut)(instance)
    }
}

impl fmt::Debug for ProxyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();
        f.debug_struct("ProxyRegistry")
            .field("proxies", &entries.values().map(|e| e.name).collect::<Vec<_>>())
            .finish()
    }
}
