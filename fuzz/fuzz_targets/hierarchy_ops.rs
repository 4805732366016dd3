#![no_main]

use libfuzzer_sys::fuzz_target;
use ferrous_inject::{BindingHierarchy, ComponentKey, InstanceProvider, Provider};
use std::collections::BTreeMap;
use std::sync::Arc;

fn provider(value: u8) -> Arc<dyn Provider> {
    Arc::new(InstanceProvider::new(Arc::new(value)))
}

fuzz_target!(|data: &[u8]| {
    let ours = BindingHierarchy::new(ComponentKey::of::<u8>().view());
    let theirs = BindingHierarchy::new(ComponentKey::of::<u8>().view());
    let mut model: BTreeMap<i32, u8> = BTreeMap::new();

    // Each pair of bytes is one operation: opcode, then operand
    for chunk in data.chunks_exact(2) {
        let (op, arg) = (chunk[0], chunk[1]);
        let priority = i32::from(arg as i8);
        match op % 4 {
            0 => {
                ours.add_at(priority, provider(arg));
                model.insert(priority, arg);
            }
            1 => {
                ours.add(provider(arg));
                model.insert(-1, arg);
            }
            2 => {
                let chosen = ours.add_next(provider(arg));
                let expected = model.keys().next_back().map_or(-1, |max| max + 1);
                assert_eq!(chosen, expected);
                model.insert(chosen, arg);
            }
            _ => {
                theirs.add_at(priority, provider(arg));
            }
        }
    }

    let priorities = ours.priorities();
    assert!(priorities.windows(2).all(|w| w[0] > w[1]));
    assert_eq!(priorities, model.keys().rev().copied().collect::<Vec<_>>());

    let merged = ours.merge(&theirs);
    for priority in ours.priorities() {
        assert!(Arc::ptr_eq(&merged.get(priority).unwrap(), &ours.get(priority).unwrap()));
    }
    for priority in theirs.priorities() {
        assert!(merged.get(priority).is_some());
    }
    assert!(merged.size() <= ours.size() + theirs.size());
});
