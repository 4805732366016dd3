/// Binding hierarchy ordering, overwrite and merge behaviour
mod common;

use std::sync::Arc;

use common::{count_warnings, value};
use ferrous_inject::{
    ApplicationContext, BindingHierarchy, ComponentKey, Provider, Resolver, DEFAULT_PRIORITY,
};

fn hierarchy() -> BindingHierarchy {
    BindingHierarchy::new(ComponentKey::of::<u32>().view())
}

fn provided(provider: &Arc<dyn Provider>) -> u32 {
    let context = ApplicationContext::new();
    *provider
        .provide(&context)
        .unwrap()
        .unwrap()
        .downcast::<u32>()
        .unwrap()
}

#[test]
fn test_iteration_is_descending_by_priority() {
    let h = hierarchy();
    let (a, b, c) = (value(1u32), value(2u32), value(3u32));

    h.add_at(1, a.clone());
    h.add_at(2, b.clone());
    h.add_at(0, c.clone());

    assert_eq!(h.priorities(), vec![2, 1, 0]);
    let providers = h.providers();
    assert!(Arc::ptr_eq(&providers[0], &b));
    assert!(Arc::ptr_eq(&providers[1], &a));
    assert!(Arc::ptr_eq(&providers[2], &c));
    assert_eq!(h.highest_priority(), Some(2));
    assert!(Arc::ptr_eq(&h.highest().unwrap(), &b));
}

#[test]
fn test_merge_combines_entries() {
    let h1 = hierarchy();
    h1.add_at(0, value(10u32)).add_at(1, value(11u32));
    let h2 = hierarchy();
    h2.add_at(2, value(12u32));

    let merged = h1.merge(&h2);

    assert_eq!(merged.size(), 3);
    assert_eq!(merged.priorities(), vec![2, 1, 0]);
    assert_eq!(provided(&merged.get(2).unwrap()), 12);
    assert_eq!(provided(&merged.get(0).unwrap()), 10);
}

#[test]
fn test_merge_receiver_wins_collisions() {
    let h1 = hierarchy();
    h1.add_at(1, value(1u32));
    let h2 = hierarchy();
    h2.add_at(1, value(2u32)).add_at(4, value(4u32));

    let merged = h1.merge(&h2);

    assert_eq!(merged.size(), 2);
    assert_eq!(provided(&merged.get(1).unwrap()), 1);
    assert_eq!(provided(&merged.get(4).unwrap()), 4);
}

#[test]
fn test_merge_leaves_inputs_untouched() {
    let h1 = hierarchy();
    h1.add_at(0, value(1u32));
    let h2 = hierarchy();
    h2.add_at(3, value(3u32));

    let _ = h1.merge(&h2);

    assert_eq!(h1.priorities(), vec![0]);
    assert_eq!(h2.priorities(), vec![3]);
}

#[test]
fn test_merge_with_self_is_identity() {
    let h = hierarchy();
    h.add_at(5, value(5u32)).add(value(0u32));

    let merged = h.merge(&h);

    assert_eq!(merged, h);
}

#[test]
fn test_default_slot_overwrite_is_silent() {
    let h = hierarchy();
    let (first, second) = (value(1u32), value(2u32));

    let (_, warnings) = count_warnings(|| {
        h.add(first.clone());
        h.add(second.clone());
    });

    assert_eq!(warnings, 0);
    assert_eq!(h.size(), 1);
    assert!(Arc::ptr_eq(&h.get(DEFAULT_PRIORITY).unwrap(), &second));
}

#[test]
fn test_explicit_overwrite_warns_once() {
    let h = hierarchy();
    let (first, second) = (value(1u32), value(2u32));

    let (_, warnings) = count_warnings(|| {
        h.add_at(1, first.clone());
        h.add_at(1, second.clone());
    });

    assert_eq!(warnings, 1);
    assert_eq!(h.size(), 1);
    assert!(Arc::ptr_eq(&h.get(1).unwrap(), &second));
}

#[test]
fn test_distinct_priorities_do_not_warn() {
    let h = hierarchy();

    let (_, warnings) = count_warnings(|| {
        h.add_at(0, value(0u32));
        h.add_at(1, value(1u32));
        h.add(value(2u32));
    });

    assert_eq!(warnings, 0);
    assert_eq!(h.size(), 3);
}

#[test]
fn test_add_next_counts_up_from_default() {
    let h = hierarchy();

    assert_eq!(h.add_next(value(1u32)), -1);
    assert_eq!(h.add_next(value(2u32)), 0);
    assert_eq!(h.add_next(value(3u32)), 1);

    assert_eq!(h.priorities(), vec![1, 0, -1]);
    assert_eq!(provided(&h.highest().unwrap()), 3);
}

#[test]
fn test_add_next_goes_above_explicit_priorities() {
    let h = hierarchy();
    h.add_at(10, value(10u32));

    assert_eq!(h.add_next(value(11u32)), 11);
    assert_eq!(h.highest_priority(), Some(11));
}

#[test]
fn test_empty_hierarchy() {
    let h = hierarchy();

    assert!(h.is_empty());
    assert_eq!(h.size(), 0);
    assert!(h.highest().is_none());
    assert!(h.highest_priority().is_none());
    assert!(h.get(DEFAULT_PRIORITY).is_none());
}

#[test]
fn test_clone_is_a_snapshot() {
    let h = hierarchy();
    h.add_at(1, value(1u32));

    let copy = h.clone();
    h.add_at(2, value(2u32));

    assert_eq!(copy.priorities(), vec![1]);
    assert_eq!(h.priorities(), vec![2, 1]);
}

#[test]
fn test_equality_is_by_provider_identity() {
    let shared = value(1u32);
    let h1 = hierarchy();
    h1.add_at(0, shared.clone());
    let h2 = hierarchy();
    h2.add_at(0, shared);
    let h3 = hierarchy();
    h3.add_at(0, value(1u32));

    assert_eq!(h1, h2);
    assert_ne!(h1, h3);
}

#[test]
fn test_display_lists_entries_in_order() {
    let h = hierarchy();
    h.add(value(0u32)).add_at(3, value(3u32));

    assert_eq!(h.to_string(), "u32 { 3: instance, -1: instance }");
}

#[test]
fn test_install_hierarchy_merges_over_existing() {
    let context = ApplicationContext::new();
    context.bind::<u32>().priority(0).singleton(1);
    context.bind::<u32>().priority(2).singleton(2);

    let prepared = hierarchy();
    prepared.add_at(2, value(20u32)).add_at(5, value(50u32));
    let installed = context.install_hierarchy(prepared);

    assert_eq!(installed.priorities(), vec![5, 2, 0]);
    assert_eq!(provided(&installed.get(2).unwrap()), 20);
    assert!(Arc::ptr_eq(
        &context.hierarchy(&ComponentKey::of::<u32>()),
        &installed
    ));
}

#[test]
fn test_handles_survive_install_hierarchy() {
    let context = ApplicationContext::new();
    let handle = context.hierarchy(&ComponentKey::of::<u32>());
    handle.add_at(0, value(1u32));

    let prepared = hierarchy();
    prepared.add_at(1, value(2u32));
    let installed = context.install_hierarchy(prepared);
    assert!(Arc::ptr_eq(&handle, &installed));

    handle.add_at(5, value(5u32));

    assert_eq!(
        context.hierarchy(&ComponentKey::of::<u32>()).priorities(),
        vec![5, 1, 0]
    );
    assert_eq!(*context.get_typed::<u32>().unwrap(), 5);
}

#[test]
fn test_install_hierarchy_warns_on_explicit_collision() {
    let context = ApplicationContext::new();
    context.bind::<u32>().priority(3).singleton(1);

    let prepared = hierarchy();
    prepared.add_at(3, value(30u32)).add_at(4, value(40u32));
    let (_, warnings) = count_warnings(|| context.install_hierarchy(prepared));

    assert_eq!(warnings, 1);
}
