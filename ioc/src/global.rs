//! The process-wide default container and free functions forwarding to it.
//!
//! The default container is a [`Container`] created on first access, and lives for the rest of
//! the process. [`replace_global`] swaps in any other [`Injector`], which is mostly useful for
//! tests.

use crate::container::Container;
use crate::descriptor::Describe;
use crate::error::Result;
use crate::injector::Injector;
use crate::instance::IntoInstance;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;

static DEFAULT_CONTAINER: Lazy<RwLock<Arc<dyn Injector>>> = Lazy::new(|| {
  let container: Arc<dyn Injector> = Arc::new(Container::new());
  RwLock::new(container)
});

/// Provides a handle to the current default container.
///
/// # Examples
///
/// ```
/// use fibre_inject::{capability, component, global};
///
/// trait Clock: Send + Sync {
///   fn now(&self) -> u64;
/// }
///
/// #[derive(Default)]
/// struct FrozenClock;
///
/// impl Clock for FrozenClock {
///   fn now(&self) -> u64 {
///     42
///   }
/// }
///
/// capability!(Clock = [FrozenClock]);
/// component!(FrozenClock);
///
/// fn register_services() {
///   global().register_type::<dyn Clock, FrozenClock>().unwrap();
/// }
///
/// register_services();
/// assert_eq!(global().inject::<dyn Clock>().unwrap().now(), 42);
/// ```
pub fn global() -> Arc<dyn Injector> {
  DEFAULT_CONTAINER.read().clone()
}

/// Installs `container` as the default container and returns the previous one.
///
/// Handles obtained through [`global`] before the swap keep pointing at the old container.
pub fn replace_global<C: Injector + 'static>(container: C) -> Arc<dyn Injector> {
  std::mem::replace(&mut *DEFAULT_CONTAINER.write(), Arc::new(container))
}

/// Binds capability `I` to the concrete type `C` in the default container.
pub fn register_type<I, C>() -> Result<()>
where
  I: ?Sized + Describe,
  C: ?Sized + Describe,
{
  global().register_type::<I, C>()
}

/// Binds capability `I` to `instance` in the default container.
///
/// Always name the capability explicitly (`register::<dyn Logger, _>(…)`); the concrete type
/// alone is never a capability.
pub fn register<I, C>(instance: C) -> Result<()>
where
  I: ?Sized + Describe,
  C: IntoInstance,
{
  global().register::<I, C>(instance)
}

/// Binds capability `I` to the caller's allocation in the default container.
pub fn register_shared<I, C>(instance: Arc<C>) -> Result<()>
where
  I: ?Sized + Describe,
  C: Describe + Send + Sync,
{
  global().register_shared::<I, C>(instance)
}

/// Resolves capability `I` from the default container.
pub fn inject<I>() -> Result<Arc<I>>
where
  I: ?Sized + Describe,
{
  global().inject::<I>()
}

/// Resolves capability `I` from the default container into `slot`.
///
/// On error `slot` is left untouched.
pub fn inject_at<I>(slot: &mut Option<Arc<I>>) -> Result<()>
where
  I: ?Sized + Describe,
{
  *slot = Some(inject::<I>()?);
  Ok(())
}
