/// Property-based tests for binding hierarchies
mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use common::value;
use ferrous_inject::{BindingHierarchy, ComponentKey, Provider};
use proptest::prelude::*;

fn hierarchy() -> BindingHierarchy {
    BindingHierarchy::new(ComponentKey::of::<i64>().view())
}

proptest! {
    #[test]
    fn prop_priorities_are_strictly_descending(priorities in prop::collection::vec(-50i32..50, 0..40)) {
        let h = hierarchy();
        for priority in &priorities {
            h.add_at(*priority, value(i64::from(*priority)));
        }

        let listed = h.priorities();
        prop_assert!(listed.windows(2).all(|w| w[0] > w[1]));

        let mut expected: Vec<i32> = priorities.clone();
        expected.sort_unstable();
        expected.dedup();
        expected.reverse();
        prop_assert_eq!(listed, expected);
    }

    #[test]
    fn prop_last_write_wins(writes in prop::collection::vec((-10i32..10, any::<u8>()), 1..30)) {
        let h = hierarchy();
        let mut last: BTreeMap<i32, Arc<dyn Provider>> = BTreeMap::new();
        for (priority, v) in writes {
            let provider = value(v);
            h.add_at(priority, provider.clone());
            last.insert(priority, provider);
        }

        prop_assert_eq!(h.size(), last.len());
        for (priority, provider) in last {
            prop_assert!(Arc::ptr_eq(&h.get(priority).unwrap(), &provider));
        }
    }

    #[test]
    fn prop_add_next_always_becomes_highest(
        initial in prop::collection::vec(-20i32..20, 0..10),
        appended in 1usize..10
    ) {
        let h = hierarchy();
        for priority in &initial {
            h.add_at(*priority, value(0u8));
        }

        for _ in 0..appended {
            let before = h.highest_priority();
            let provider = value(1u8);
            let chosen = h.add_next(provider.clone());

            match before {
                Some(max) => prop_assert_eq!(chosen, max + 1),
                None => prop_assert_eq!(chosen, -1),
            }
            prop_assert!(Arc::ptr_eq(&h.highest().unwrap(), &provider));
        }
    }

    #[test]
    fn prop_merge_is_union_with_receiver_precedence(
        ours in prop::collection::btree_set(-15i32..15, 0..12),
        theirs in prop::collection::btree_set(-15i32..15, 0..12)
    ) {
        let a = hierarchy();
        for priority in &ours {
            a.add_at(*priority, value(1u8));
        }
        let b = hierarchy();
        for priority in &theirs {
            b.add_at(*priority, value(2u8));
        }

        let merged = a.merge(&b);

        let mut union: Vec<i32> = ours.union(&theirs).copied().collect();
        union.reverse();
        prop_assert_eq!(merged.priorities(), union);
        for priority in &ours {
            prop_assert!(Arc::ptr_eq(&merged.get(*priority).unwrap(), &a.get(*priority).unwrap()));
        }
        for priority in theirs.difference(&ours) {
            prop_assert!(Arc::ptr_eq(&merged.get(*priority).unwrap(), &b.get(*priority).unwrap()));
        }
    }

    #[test]
    fn prop_merge_with_self_is_identity(priorities in prop::collection::vec(-10i32..10, 0..20)) {
        let h = hierarchy();
        for priority in priorities {
            h.add_at(priority, value(0u8));
        }

        prop_assert_eq!(h.merge(&h), h);
    }
}
