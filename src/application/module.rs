//! Configuration units that declare bindings.

use crate::application::ApplicationContext;
use crate::error::DiResult;

/// A reusable group of binding declarations.
///
/// # Example
///
/// ```rust
/// use ferrous_inject::{ApplicationContext, ComponentModule, DiResult, Resolver};
/// use std::sync::Arc;
///
/// struct Settings {
///     workers: usize,
/// }
///
/// struct SettingsModule;
///
/// impl ComponentModule for SettingsModule {
///     fn configure(&self, context: &ApplicationContext) -> DiResult<()> {
///         context.bind::<Settings>().singleton(Settings { workers: 4 });
///         context.bind::<usize>().named("workers").factory(|ctx| {
///             Ok(Arc::new(ctx.get_typed::<Settings>()?.workers))
///         });
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let context = ApplicationContext::new();
/// context.install(SettingsModule)?;
/// assert_eq!(*context.get_named::<usize>("workers")?, 4);
/// # Ok(())
/// # }
/// ```
pub trait ComponentModule {
    fn configure(&self, context: &ApplicationContext) -> DiResult<()>;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
