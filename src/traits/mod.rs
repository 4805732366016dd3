//! Core traits for component resolution.

mod resolver;

pub use resolver::{Resolver, ResolverCore};
