/// Resolution through binding hierarchies: priorities, strictness,
/// constructor selection and failure propagation
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ferrous_inject::{
    ApplicationContext, BoundFactoryProvider, ComponentKey, ConstructorView, DiError, InjectConfig,
    InjectionPoint, Instance, Lifetime, Provider, ProviderKind, ResolutionObserver, Resolver,
    TypeView,
};

trait CharSequence: Send + Sync {
    fn text(&self) -> String;
}

#[derive(Default)]
struct AlphaText;

impl CharSequence for AlphaText {
    fn text(&self) -> String {
        "alpha".into()
    }
}

struct BetaText;

impl CharSequence for BetaText {
    fn text(&self) -> String {
        "beta".into()
    }
}

fn alpha_view() -> TypeView {
    TypeView::builder::<AlphaText>()
        .default_constructor()
        .implements::<dyn CharSequence>(|s| s as Arc<dyn CharSequence>)
        .build()
}

fn beta_view() -> TypeView {
    TypeView::builder::<BetaText>()
        .implements::<dyn CharSequence>(|s| s as Arc<dyn CharSequence>)
        .build()
}

fn loose_key() -> ComponentKey {
    ComponentKey::builder::<dyn CharSequence>().strict(false).build()
}

#[test]
fn test_highest_priority_wins() {
    let context = ApplicationContext::new();
    context.bind::<u32>().priority(0).singleton(1);
    context.bind::<u32>().priority(5).singleton(5);
    context.bind::<u32>().singleton(100);

    assert_eq!(*context.get_typed::<u32>().unwrap(), 5);
}

#[test]
fn test_unbound_key_fails_with_component_resolution() {
    let context = ApplicationContext::new();

    let err = context.get_typed::<u64>().unwrap_err();

    assert!(matches!(err, DiError::ComponentResolution { ref key } if key == "u64"));
    assert!(context.get_optional::<u64>().unwrap().is_none());
}

#[test]
fn test_provider_failure_is_not_masked_by_lower_priorities() {
    let context = ApplicationContext::new();
    context.bind::<u32>().priority(0).singleton(7);
    context
        .bind::<u32>()
        .priority(1)
        .supplier(|| Err("connection refused".into()));

    let err = context.get_typed::<u32>().unwrap_err();

    match &err {
        DiError::ProviderFailed { key, source } => {
            assert_eq!(key, "u32");
            assert_eq!(source.to_string(), "connection refused");
        }
        other => panic!("expected ProviderFailed, got {other:?}"),
    }
    assert!(context.get_optional::<u32>().is_err());
}

#[test]
fn test_provider_without_value_does_not_fall_through() {
    #[derive(Debug)]
    struct Gadget;

    let context = ApplicationContext::new();
    context.bind::<Gadget>().priority(0).singleton(Gadget);
    // No type view for Gadget, so the context-driven provider yields nothing
    context.bind::<Gadget>().priority(1).to_self();

    let err = context.get_typed::<Gadget>().unwrap_err();

    assert!(err.is_unresolved());
}

#[test]
fn test_strict_key_does_not_consider_supertypes() {
    let context = ApplicationContext::new();
    context.register_type(alpha_view());
    context.bind::<AlphaText>().singleton(AlphaText);

    let strict = ComponentKey::builder::<dyn CharSequence>().strict(true).build();
    let err = context.get(&strict).unwrap_err();
    assert!(matches!(err, DiError::ComponentResolution { .. }));

    let loose = context.get_by_key::<dyn CharSequence>(&loose_key()).unwrap();
    assert_eq!(loose.text(), "alpha");
}

#[test]
fn test_undefined_strictness_follows_config() {
    let strict = ApplicationContext::new();
    strict.register_type(alpha_view());
    strict.bind::<AlphaText>().singleton(AlphaText);
    assert!(strict.get_typed::<dyn CharSequence>().is_err());

    let loose = ApplicationContext::builder()
        .config(InjectConfig::default().strict_mode(false))
        .type_view(alpha_view())
        .build();
    loose.bind::<AlphaText>().singleton(AlphaText);
    assert_eq!(loose.get_typed::<dyn CharSequence>().unwrap().text(), "alpha");
}

#[test]
fn test_loose_resolution_prefers_exact_binding() {
    let context = ApplicationContext::new();
    context.register_type(alpha_view());
    context.bind::<AlphaText>().singleton(AlphaText);
    context
        .bind::<dyn CharSequence>()
        .singleton_arc(Arc::new(BetaText));

    let value = context.get_by_key::<dyn CharSequence>(&loose_key()).unwrap();

    assert_eq!(value.text(), "beta");
}

#[test]
fn test_loose_resolution_is_ordered_by_type_name() {
    let context = ApplicationContext::new();
    context.register_type(beta_view());
    context.register_type(alpha_view());
    context.bind::<BetaText>().singleton(BetaText);
    context.bind::<AlphaText>().singleton(AlphaText);

    for _ in 0..5 {
        let value = context.get_by_key::<dyn CharSequence>(&loose_key()).unwrap();
        assert_eq!(value.text(), "alpha");
    }
}

#[test]
fn test_loose_resolution_respects_qualifiers() {
    let context = ApplicationContext::new();
    context.register_type(alpha_view());
    context.bind::<AlphaText>().named("greek").singleton(AlphaText);

    assert!(context.get(&loose_key()).is_err());

    let named = ComponentKey::builder::<dyn CharSequence>()
        .name("greek")
        .strict(false)
        .build();
    assert_eq!(context.get_by_key::<dyn CharSequence>(&named).unwrap().text(), "alpha");
}

#[test]
fn test_bind_to_implementation() {
    let context = ApplicationContext::new();
    context.register_type(alpha_view());
    context
        .bind::<dyn CharSequence>()
        .to::<AlphaText>(|s| s as Arc<dyn CharSequence>);

    assert_eq!(context.get_typed::<dyn CharSequence>().unwrap().text(), "alpha");

    let descriptor = &context.binding_descriptors()[0];
    assert_eq!(descriptor.provider, ProviderKind::Composed);
    assert_eq!(descriptor.concrete, ProviderKind::ContextDriven);
}

struct Widget {
    built_by: &'static str,
}

#[test]
fn test_optimal_constructor_has_most_parameters() {
    let context = ApplicationContext::new();
    context.register_type(
        TypeView::builder::<Widget>()
            .constructor(ConstructorView::new(Vec::new(), |_| Ok(Widget { built_by: "default" })))
            .constructor(
                ConstructorView::new(vec![InjectionPoint::of::<u32>("size")], |_| {
                    Ok(Widget { built_by: "one" })
                })
                .injectable(),
            )
            .constructor(
                ConstructorView::new(
                    vec![InjectionPoint::of::<u32>("size"), InjectionPoint::of::<String>("label")],
                    |_| Ok(Widget { built_by: "two-first" }),
                )
                .injectable(),
            )
            .constructor(
                ConstructorView::new(
                    vec![InjectionPoint::of::<String>("label"), InjectionPoint::of::<u32>("size")],
                    |_| Ok(Widget { built_by: "two-second" }),
                )
                .injectable(),
            )
            .build(),
    );
    context.bind::<u32>().singleton(3);
    context.bind::<String>().singleton("w".to_string());
    context.bind::<Widget>().to_self();

    assert_eq!(context.get_typed::<Widget>().unwrap().built_by, "two-first");
}

#[test]
fn test_default_constructor_used_without_injectable_ones() {
    let context = ApplicationContext::new();
    context.register_type(
        TypeView::builder::<Widget>()
            .constructor(ConstructorView::new(Vec::new(), |_| Ok(Widget { built_by: "default" })))
            .build(),
    );
    context.bind::<Widget>().to_self();

    assert_eq!(context.get_typed::<Widget>().unwrap().built_by, "default");
}

#[test]
fn test_constructor_arguments_are_resolved() {
    struct Server {
        port: Arc<u16>,
        host: Option<Arc<String>>,
    }

    let context = ApplicationContext::new();
    context.register_type(
        TypeView::builder::<Server>()
            .constructor(
                ConstructorView::new(
                    vec![
                        InjectionPoint::of::<u16>("port"),
                        InjectionPoint::of::<String>("host").optional(),
                    ],
                    |args| {
                        Ok(Server {
                            port: args.required::<u16>(0)?,
                            host: args.get::<String>(1),
                        })
                    },
                )
                .injectable(),
            )
            .build(),
    );
    context.bind::<u16>().singleton(8080);
    context.bind::<Server>().to_self();

    let server = context.get_typed::<Server>().unwrap();
    assert_eq!(*server.port, 8080);
    assert!(server.host.is_none());
}

#[test]
fn test_missing_required_constructor_argument() {
    #[derive(Debug)]
    struct Client {
        _timeout: Arc<u64>,
    }

    let context = ApplicationContext::new();
    context.register_type(
        TypeView::builder::<Client>()
            .constructor(
                ConstructorView::new(vec![InjectionPoint::of::<u64>("timeout")], |args| {
                    Ok(Client {
                        _timeout: args.required::<u64>(0)?,
                    })
                })
                .injectable(),
            )
            .build(),
    );
    context.bind::<Client>().to_self();

    let err = context.get_typed::<Client>().unwrap_err();

    match &err {
        DiError::ComponentRequired { point, source, .. } => {
            assert!(point.ends_with("::new(timeout)"));
            assert!(source.is_unresolved());
        }
        other => panic!("expected ComponentRequired, got {other:?}"),
    }
}

#[test]
fn test_install_if_absent_creates_binding() {
    #[derive(Default)]
    struct Engine;

    let context = ApplicationContext::new();
    context.register_type(TypeView::builder::<Engine>().default_constructor().build());

    assert!(context.get_typed::<Engine>().is_err());

    let key = ComponentKey::builder::<Engine>().install_if_absent().build();
    assert!(context.get(&key).unwrap().is::<Engine>());

    let hierarchy = context.find_hierarchy(&key.view()).unwrap();
    assert_eq!(hierarchy.size(), 1);
    assert_eq!(hierarchy.highest().unwrap().kind(), ProviderKind::ContextDriven);

    // The installed binding now serves plain lookups too
    assert!(context.get_typed::<Engine>().is_ok());
}

#[test]
fn test_singleton_lifetime_caches_first_value() {
    let context = ApplicationContext::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    context
        .bind::<String>()
        .lifetime(Lifetime::Singleton)
        .supplier(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new("shared".to_string()))
        });

    let first = context.get_typed::<String>().unwrap();
    let second = context.get_typed::<String>().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_prototype_lifetime_builds_every_time() {
    let context = ApplicationContext::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    context.bind::<usize>().supplier(move || Ok(Arc::new(counter.fetch_add(1, Ordering::SeqCst))));

    assert_eq!(*context.get_typed::<usize>().unwrap(), 0);
    assert_eq!(*context.get_typed::<usize>().unwrap(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_factory_binding_resolves_dependencies() {
    let context = ApplicationContext::new();
    context.bind::<String>().named("user").singleton("ada".to_string());
    context
        .bind::<String>()
        .factory(|ctx| Ok(Arc::new(format!("hello {}", ctx.get_named::<String>("user")?))));

    assert_eq!(*context.get_typed::<String>().unwrap(), "hello ada");
}

#[derive(Debug)]

struct CycleA;
struct CycleB;

#[test]
fn test_circular_dependency_is_reported() {
    let context = ApplicationContext::new();
    context.register_type(
        TypeView::builder::<CycleA>()
            .constructor(
                ConstructorView::new(vec![InjectionPoint::of::<CycleB>("b")], |_| Ok(CycleA))
                    .injectable(),
            )
            .build(),
    );
    context.register_type(
        TypeView::builder::<CycleB>()
            .constructor(
                ConstructorView::new(vec![InjectionPoint::of::<CycleA>("a")], |_| Ok(CycleB))
                    .injectable(),
            )
            .build(),
    );
    context.bind::<CycleA>().to_self();
    context.bind::<CycleB>().to_self();

    let err = context.get_typed::<CycleA>().unwrap_err();

    match err.root_cause() {
        DiError::Circular(path) => {
            assert_eq!(path.len(), 3);
            assert_eq!(path.first(), path.last());
            assert!(path[0].ends_with("CycleA"));
            assert!(path[1].ends_with("CycleB"));
        }
        other => panic!("expected Circular, got {other:?}"),
    }

    // The resolution stack unwound; unrelated lookups still work
    context.bind::<u8>().singleton(1);
    assert_eq!(*context.get_typed::<u8>().unwrap(), 1);
}

#[test]
fn test_depth_limit() {
    #[derive(Debug)]
    struct Top;
    struct Middle;
    #[derive(Default)]
    struct Bottom;

    let context = ApplicationContext::builder()
        .config(InjectConfig::default().max_depth(2))
        .type_view(
            TypeView::builder::<Top>()
                .constructor(
                    ConstructorView::new(vec![InjectionPoint::of::<Middle>("m")], |_| Ok(Top))
                        .injectable(),
                )
                .build(),
        )
        .type_view(
            TypeView::builder::<Middle>()
                .constructor(
                    ConstructorView::new(vec![InjectionPoint::of::<Bottom>("b")], |_| Ok(Middle))
                        .injectable(),
                )
                .build(),
        )
        .type_view(TypeView::builder::<Bottom>().default_constructor().build())
        .build();
    context.bind::<Top>().to_self();
    context.bind::<Middle>().to_self();
    context.bind::<Bottom>().to_self();

    let err = context.get_typed::<Top>().unwrap_err();
    assert!(matches!(err.root_cause(), DiError::DepthExceeded(2)));

    assert!(context.get_typed::<Middle>().is_ok());
}

#[derive(Debug)]

struct Pair {
    built_by: &'static str,
}

fn pair_view() -> TypeView {
    TypeView::builder::<Pair>()
        .constructor(
            ConstructorView::new(vec![InjectionPoint::of::<u32>("number")], |_| {
                Ok(Pair { built_by: "number" })
            })
            .bound(),
        )
        .constructor(
            ConstructorView::new(vec![InjectionPoint::of::<String>("name")], |_| {
                Ok(Pair { built_by: "name" })
            })
            .bound(),
        )
        .constructor(
            ConstructorView::new(vec![InjectionPoint::of::<u32>("other")], |_| {
                Ok(Pair { built_by: "second-number" })
            })
            .bound(),
        )
        .build()
}

#[test]
fn test_bound_factory_picks_first_matching_constructor() {
    let context = ApplicationContext::new();
    context.register_type(pair_view());

    let by_number = context.factory::<Pair>(vec![Some(Instance::of(5u32))]).unwrap();
    let by_name = context
        .factory::<Pair>(vec![Some(Instance::of("p".to_string()))])
        .unwrap();
    let absent = context.factory::<Pair>(vec![None]).unwrap();

    assert_eq!(by_number.built_by, "number");
    assert_eq!(by_name.built_by, "name");
    assert_eq!(absent.built_by, "number");
}

#[test]
fn test_bound_factory_without_match() {
    let context = ApplicationContext::new();
    context.register_type(pair_view());

    let provider = BoundFactoryProvider::of::<Pair>(vec![
        Some(Instance::of(1u32)),
        Some(Instance::of(2u32)),
    ]);
    assert!(provider.provide(&context).unwrap().is_none());
    assert!(context
        .factory::<Pair>(vec![Some(Instance::of(1.5f64))])
        .unwrap_err()
        .is_unresolved());
}

#[test]
fn test_bound_factory_single_constructor_fallback() {
    #[derive(Debug)]
    struct Label {
        text: Arc<String>,
    }

    let context = ApplicationContext::new();
    context.register_type(
        TypeView::builder::<Label>()
            .constructor(ConstructorView::new(
                vec![InjectionPoint::of::<String>("text")],
                |args| Ok(Label { text: args.required::<String>(0)? }),
            ))
            .build(),
    );

    let label = context
        .factory::<Label>(vec![Some(Instance::of("ok".to_string()))])
        .unwrap();
    assert_eq!(*label.text, "ok");

    // Failing fallback constructor produces nothing instead of an error
    let err = context.factory::<Label>(vec![None]).unwrap_err();
    assert!(err.is_unresolved());
}

#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl ResolutionObserver for RecordingObserver {
    fn resolving(&self, key: &ComponentKey) {
        self.events.lock().unwrap().push(format!("resolving {key}"));
    }

    fn resolved(&self, key: &ComponentKey, _duration: Duration) {
        self.events.lock().unwrap().push(format!("resolved {key}"));
    }

    fn resolution_failed(&self, key: &ComponentKey, _error: &DiError) {
        self.events.lock().unwrap().push(format!("failed {key}"));
    }
}

#[test]
fn test_observers_see_every_resolution() {
    let observer = Arc::new(RecordingObserver::default());
    let context = ApplicationContext::builder().observer(observer.clone()).build();
    context.bind::<u32>().singleton(1);

    let _ = context.get_typed::<u32>();
    let _ = context.get_typed::<u64>();

    let events = observer.events.lock().unwrap();
    assert_eq!(
        *events,
        vec!["resolving u32", "resolved u32", "resolving u64", "failed u64"]
    );
}
