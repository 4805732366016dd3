//! Internal implementation details.

pub(crate) mod circular;

pub(crate) use circular::ResolutionGuard;

// Hash map used for registries keyed by type or binding key
#[cfg(feature = "ahash")]
pub(crate) type KeyMap<K, V> = ahash::AHashMap<K, V>;
#[cfg(not(feature = "ahash"))]
pub(crate) type KeyMap<K, V> = std::collections::HashMap<K, V>;
