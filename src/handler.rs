//! Handling of failures that population is allowed to swallow.

use tracing::warn;

use crate::error::DiError;

/// Receives resolution failures for optional injection points.
///
/// The failure does not propagate; the slot is left absent and population
/// continues.
pub trait ExceptionHandler: Send + Sync {
    fn handle(&self, point: &str, owner: &'static str, error: &DiError);
}

/// Logs swallowed failures at WARN.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingExceptionHandler;

impl ExceptionHandler for LoggingExceptionHandler {
    fn handle(&self, point: &str, owner: &'static str, error: &DiError) {
        warn!(point, owner, %error, "Optional injection point could not be resolved");
    }
}
