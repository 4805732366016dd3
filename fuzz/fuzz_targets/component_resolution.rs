#![no_main]

use libfuzzer_sys::fuzz_target;
use ferrous_inject::{ApplicationContext, ComponentKey, Lifetime, Resolver};
use std::sync::Arc;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    let context = ApplicationContext::new();
    let mut highest: Option<(i32, u32)> = None;

    // Bind u32 values at fuzzed priorities under a fuzzed name
    for chunk in data[1..].chunks_exact(3) {
        let priority = i32::from(chunk[0] as i8);
        let value = u32::from(chunk[1]);
        let binder = context.bind::<u32>().priority(priority);
        if chunk[2] % 2 == 0 {
            binder.singleton(value);
        } else {
            binder
                .lifetime(Lifetime::Singleton)
                .supplier(move || Ok(Arc::new(value)));
        }
        highest = match highest {
            Some((p, _)) if p > priority => highest,
            _ => Some((priority, value)),
        };
    }

    match highest {
        Some((_, value)) => assert_eq!(*context.get_typed::<u32>().unwrap(), value),
        None => assert!(context.get_typed::<u32>().unwrap_err().is_unresolved()),
    }

    let name = format!("n{}", data[0] % 8);
    assert!(context.get(&ComponentKey::named::<u32>(name)).is_err());
});
