//! The contract a container must meet to sit behind the global facade.

use crate::descriptor::{Describe, TypeDescriptor};
use crate::error::Result;
use crate::instance::{Instance, IntoInstance, Resolved};
use std::sync::Arc;

/// The descriptor surface of a dependency-injection container.
///
/// [`Container`](crate::Container) is the stock implementation. Anything implementing this
/// trait can be installed as the default container with
/// [`replace_global`](crate::replace_global), for example a wrapper that records or restricts
/// what is bound. The typed helpers (`register_type`, `inject`, …) are available on any
/// `dyn Injector`.
pub trait Injector: Send + Sync {
  /// Binds `capability` to the concrete type `concrete` without creating an instance.
  fn bind_type(
    &self,
    capability: Option<&TypeDescriptor>,
    concrete: Option<&TypeDescriptor>,
  ) -> Result<()>;

  /// Binds `capability` to a ready instance.
  fn bind_instance(
    &self,
    capability: Option<&TypeDescriptor>,
    instance: Option<Instance>,
  ) -> Result<()>;

  /// Resolves the singleton bound to `capability`.
  fn resolve(&self, capability: Option<&TypeDescriptor>) -> Result<Resolved>;
}

impl dyn Injector {
  pub fn register_type<I, C>(&self) -> Result<()>
  where
    I: ?Sized + Describe,
    C: ?Sized + Describe,
  {
    self.bind_type(Some(&I::describe()), Some(&C::describe()))
  }

  pub fn register<I, C>(&self, instance: C) -> Result<()>
  where
    I: ?Sized + Describe,
    C: IntoInstance,
  {
    self.bind_instance(Some(&I::describe()), Some(instance.into_instance()))
  }

  pub fn register_shared<I, C>(&self, instance: Arc<C>) -> Result<()>
  where
    I: ?Sized + Describe,
    C: Describe + Send + Sync,
  {
    self.bind_instance(Some(&I::describe()), Some(Instance::shared(instance)))
  }

  pub fn inject<I>(&self) -> Result<Arc<I>>
  where
    I: ?Sized + Describe,
  {
    self.inject_resolved::<I>()?.into_capability::<I>()
  }

  pub fn inject_resolved<I>(&self) -> Result<Resolved>
  where
    I: ?Sized + Describe,
  {
    self.resolve(Some(&I::describe()))
  }
}
