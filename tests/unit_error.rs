/// Unit tests for DiError
use std::error::Error;

use ferrous_inject::DiError;

#[test]
fn test_component_resolution_display() {
    let err = DiError::ComponentResolution {
        key: "u32[name=\"port\"]".to_string(),
    };

    assert_eq!(err.to_string(), "No compatible binding found for u32[name=\"port\"]");
    assert!(err.is_unresolved());
    assert!(err.source().is_none());
}

#[test]
fn test_invalid_qualifier_display() {
    let err = DiError::InvalidQualifier {
        qualifier: "Region",
        expected: vec!["value".to_string()],
        actual: vec![],
    };

    assert_eq!(
        err.to_string(),
        "Invalid qualifier metadata for @Region: expected attributes [\"value\"], got []"
    );
}

#[test]
fn test_provider_failed_keeps_source() {
    let err = DiError::ProviderFailed {
        key: "Database".to_string(),
        source: "timeout".into(),
    };

    assert_eq!(err.to_string(), "Provider for Database failed: timeout");
    assert_eq!(err.source().unwrap().to_string(), "timeout");
    assert!(!err.is_unresolved());
}

#[test]
fn test_component_required_chain() {
    let err = DiError::ComponentRequired {
        point: "Service.cache".to_string(),
        owner: "Service",
        source: Box::new(DiError::ComponentRequired {
            point: "Cache::new(store)".to_string(),
            owner: "Cache",
            source: Box::new(DiError::Circular(vec!["Cache".into(), "Store".into(), "Cache".into()])),
        }),
    };

    assert!(err.to_string().starts_with("Required injection point Service.cache on Service"));
    assert!(matches!(err.root_cause(), DiError::Circular(path) if path.len() == 3));
    assert!(err.source().is_some());
}

#[test]
fn test_required_not_provided_display() {
    let err = DiError::RequiredNotProvided {
        point: "Service.port".to_string(),
        owner: "Service",
    };

    assert_eq!(
        err.to_string(),
        "Injection point Service.port on Service is required but no value was provided"
    );
}

#[test]
fn test_component_population_display() {
    let err = DiError::ComponentPopulation {
        point: "Service.init".to_string(),
        owner: "Service",
        source: "bad state".into(),
    };

    assert_eq!(err.to_string(), "Failed to populate Service.init on Service: bad state");
}

#[test]
fn test_argument_count_display() {
    let err = DiError::ArgumentCount {
        point: "Service.configure".to_string(),
        expected: 2,
        actual: 1,
    };

    assert_eq!(err.to_string(), "Injection point Service.configure expects 2 value(s), got 1");
}

#[test]
fn test_circular_display() {
    let err = DiError::Circular(vec!["A".into(), "B".into(), "A".into()]);

    assert_eq!(err.to_string(), "Circular dependency: A -> B -> A");
    assert!(std::ptr::eq(err.root_cause(), &err));
}

#[test]
fn test_depth_and_type_mismatch_display() {
    assert_eq!(DiError::DepthExceeded(64).to_string(), "Max depth 64 exceeded");
    assert_eq!(
        DiError::TypeMismatch {
            expected: "u32",
            found: "String",
        }
        .to_string(),
        "Type mismatch: expected u32, found String"
    );
}
