//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ferrous_inject::{InstanceProvider, Provider};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::Registry;

/// Counts WARN events emitted by the crate.
#[derive(Clone, Default)]
pub struct WarnCounter {
    count: Arc<AtomicUsize>,
}

impl WarnCounter {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() == Level::WARN && metadata.target().starts_with("ferrous_inject") {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Runs `f` under a subscriber that counts crate warnings.
pub fn count_warnings<R>(f: impl FnOnce() -> R) -> (R, usize) {
    let counter = WarnCounter::default();
    let subscriber = Registry::default().with(counter.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, counter.count())
}

/// Provider always yielding `value`.
pub fn value<T: Send + Sync + 'static>(value: T) -> Arc<dyn Provider> {
    Arc::new(InstanceProvider::new(Arc::new(value)))
}
