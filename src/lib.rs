//! # ferrous-inject
//!
//! Dependency injection core: binding hierarchies, component resolution and
//! component population.
//!
//! ## Features
//!
//! - **Binding hierarchies**: every contract key owns a priority-ordered set
//!   of providers; the highest priority wins
//! - **Qualifiers**: names and typed qualifiers with validated metadata
//! - **Strict and loose resolution**: exact keys, or any binding whose type
//!   declares the requested contract as a supertype
//! - **Population**: fields and methods of an existing instance are injected
//!   through pluggable strategies and required-ness rules
//! - **Proxy aware**: proxies are unwrapped so their delegate is populated
//! - **Thread-safe**: copy-on-write hierarchies, `Arc`-shared instances
//! - **No runtime reflection**: types are described once with [`TypeView`]
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_inject::{ApplicationContext, Lifetime, Resolver};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! let context = ApplicationContext::new();
//! context.bind::<Database>()
//!     .lifetime(Lifetime::Singleton)
//!     .supplier(|| Ok(Arc::new(Database { url: "postgres://localhost".into() })));
//!
//! let db = context.get_typed::<Database>().unwrap();
//! assert_eq!(db.url, "postgres://localhost");
//! assert!(Arc::ptr_eq(&db, &context.get_typed::<Database>().unwrap()));
//! ```
//!
//! ## Priorities
//!
//! ```rust
//! use ferrous_inject::{ApplicationContext, Resolver};
//!
//! let context = ApplicationContext::new();
//! context.bind::<&'static str>().singleton("default");
//! context.bind::<&'static str>().priority(10).singleton("override");
//!
//! assert_eq!(*context.get_typed::<&'static str>().unwrap(), "override");
//! ```
//!
//! ## Loose Resolution
//!
//! ```rust
//! use ferrous_inject::{ApplicationContext, ComponentKey, Resolver, TypeView};
//! use std::sync::Arc;
//!
//! trait CharSequence: Send + Sync {
//!     fn length(&self) -> usize;
//! }
//! impl CharSequence for String {
//!     fn length(&self) -> usize { self.len() }
//! }
//!
//! let context = ApplicationContext::new();
//! context.register_type(
//!     TypeView::builder::<String>()
//!         .implements::<dyn CharSequence>(|s| s as Arc<dyn CharSequence>)
//!         .build(),
//! );
//! context.bind::<String>().singleton("hello".to_string());
//!
//! let loose = ComponentKey::builder::<dyn CharSequence>().strict(false).build();
//! let text = context.get_by_key::<dyn CharSequence>(&loose).unwrap();
//! assert_eq!(text.length(), 5);
//!
//! let strict = ComponentKey::builder::<dyn CharSequence>().strict(true).build();
//! assert!(context.get(&strict).is_err());
//! ```

// Module declarations
pub mod application;
pub mod binding;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod handler;
pub mod instance;
pub mod introspect;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod populate;
pub mod provider;
pub mod proxy;
pub mod qualifier;
pub mod traits;

// Internal modules
mod internal;
mod resolution;

// Re-export core types
pub use application::{ApplicationBuilder, ApplicationContext, ComponentModule};
pub use binding::{Binder, BindingHierarchy, DEFAULT_PRIORITY};
pub use config::InjectConfig;
pub use descriptors::BindingDescriptor;
pub use error::{BoxError, DiError, DiResult};
pub use handler::{ExceptionHandler, LoggingExceptionHandler};
pub use instance::Instance;
pub use introspect::{
    Annotation, Annotations, Arguments, ConstructorView, FieldView, InjectionPoint, MethodView,
    PopulateType, Supertype, TypeRegistry, TypeView, TypeViewBuilder,
};
pub use key::{ComponentKey, ComponentKeyBuilder, ComponentKeyView, Strictness, TypeKey};
pub use lifetime::Lifetime;
pub use observer::{LoggingObserver, ResolutionObserver};
pub use populate::{
    AnnotatedInjectionPointResolver, AnnotatedRequireRule, CachingInjectionPointResolver,
    ComponentInjectionPoint, ComponentPopulationStrategy, ComponentPopulator,
    ContextPopulationStrategy, Declaration, InjectPopulationStrategy, InjectionPointResolver,
    PopulateComponentContext, RequireInjectionPointRule,
};
pub use provider::{
    unwrap_provider, BoundFactoryProvider, ComposedProvider, ContextDrivenProvider,
    FactoryProvider, InstanceProvider, Provider, ProviderKind, SingletonProvider,
    SupplierProvider,
};
pub use proxy::{Proxy, ProxyOrchestrator, ProxyRegistry};
pub use qualifier::{CompositeQualifier, MetaValue, Qualifier, QualifierKey, QualifierType};
pub use traits::{Resolver, ResolverCore};
