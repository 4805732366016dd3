//! Engine configuration.
//!
//! Values come from code, from the environment, or (with the `config`
//! feature) from JSON.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::introspect::PopulateType;

/// Environment variable overriding [`InjectConfig::strict_mode`].
pub const STRICT_ENV: &str = "FERROUS_INJECT_STRICT";
/// Environment variable overriding [`InjectConfig::max_depth`].
pub const MAX_DEPTH_ENV: &str = "FERROUS_INJECT_MAX_DEPTH";

/// Settings consulted by resolution and population.
///
/// ```rust
/// use ferrous_inject::{InjectConfig, PopulateType};
///
/// let config = InjectConfig::default();
/// assert!(config.strict_mode);
/// assert_eq!(config.max_depth, 1024);
/// assert_eq!(config.populate_type, PopulateType::All);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct InjectConfig {
    /// Strictness used by keys that leave it undefined
    pub strict_mode: bool,
    /// Maximum nesting of resolutions on one thread
    pub max_depth: usize,
    /// Population filter for types that do not declare one
    pub populate_type: PopulateType,
}

impl Default for InjectConfig {
    fn default() -> Self {
        Self {
            strict_mode: true,
            max_depth: 1024,
            populate_type: PopulateType::All,
        }
    }
}

impl InjectConfig {
    /// Defaults overridden by `FERROUS_INJECT_STRICT` and
    /// `FERROUS_INJECT_MAX_DEPTH`. Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = env::var(STRICT_ENV) {
            match parse_bool(&value) {
                Some(strict) => config.strict_mode = strict,
                None => warn!(variable = STRICT_ENV, %value, "Ignoring invalid boolean"),
            }
        }
        if let Ok(value) = env::var(MAX_DEPTH_ENV) {
            match value.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_depth = depth,
                _ => warn!(variable = MAX_DEPTH_ENV, %value, "Ignoring invalid depth"),
            }
        }
        config
    }

    /// Parses a JSON document; missing fields take their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn populate_type(mut self, populate: PopulateType) -> Self {
        self.populate_type = populate;
        self
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
