//! Values going into and coming out of the container.

use crate::descriptor::{Describe, Erased, TypeDescriptor};
use crate::error::{Error, Result};
use crate::registry::Materialized;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A caller-constructed value ready to be bound to a capability.
///
/// The descriptor is that of the value the caller handed over: a struct, or a pointer to one.
/// Pointers are not wrapped again, so `Arc<T>` and `Box<T>` keep their pointer-to-struct shape
/// and a pointer to a pointer (`Arc<Box<T>>`) is rejected as not being a struct.
pub struct Instance {
  descriptor: TypeDescriptor,
  value: Erased,
}

impl Instance {
  /// Builds an instance from anything convertible: a component, an `Arc` or a `Box` of one.
  pub fn new<T: IntoInstance>(value: T) -> Self {
    value.into_instance()
  }

  /// Describes `value` as itself and moves it into a new shared allocation.
  pub fn from_value<T: Describe + Send + Sync>(value: T) -> Self {
    Self {
      descriptor: T::describe(),
      value: Arc::new(value),
    }
  }

  /// Uses the caller's allocation as-is, so the caller keeps a handle to the exact instance.
  pub fn shared<T: Describe + Send + Sync>(value: Arc<T>) -> Self {
    Self {
      descriptor: <Arc<T>>::describe(),
      value,
    }
  }

  pub fn descriptor(&self) -> &TypeDescriptor {
    &self.descriptor
  }

  pub(crate) fn into_value(self) -> Erased {
    self.value
  }
}

/// Conversion into an [`Instance`], implemented for components by
/// [`component!`](crate::component), for scalars by this crate, and for `Arc<T>` and `Box<T>`.
pub trait IntoInstance {
  fn into_instance(self) -> Instance;
}

impl<T: Describe + Send + Sync> IntoInstance for Arc<T> {
  fn into_instance(self) -> Instance {
    Instance::shared(self)
  }
}

impl<T: Describe + Send + Sync> IntoInstance for Box<T> {
  fn into_instance(self) -> Instance {
    let value: Arc<T> = Arc::from(self);
    Instance {
      descriptor: <Box<T>>::describe(),
      value,
    }
  }
}

macro_rules! scalar_instance {
  ($($t:ty),* $(,)?) => {
    $(
      impl IntoInstance for $t {
        fn into_instance(self) -> Instance {
          Instance::from_value(self)
        }
      }
    )*
  };
}

scalar_instance!(
  (),
  bool,
  char,
  i8,
  i16,
  i32,
  i64,
  i128,
  isize,
  u8,
  u16,
  u32,
  u64,
  u128,
  usize,
  f32,
  f64,
  String,
);

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Instance")
      .field("type", &self.descriptor.name())
      .finish()
  }
}

/// A resolved singleton.
///
/// Carries both the concrete value and its capability view; both point at the same allocation.
#[derive(Clone)]
pub struct Resolved {
  capability: &'static str,
  concrete_name: &'static str,
  inner: Materialized,
}

impl Resolved {
  pub(crate) fn new(
    capability: &'static str,
    concrete_name: &'static str,
    inner: Materialized,
  ) -> Self {
    Self {
      capability,
      concrete_name,
      inner,
    }
  }

  /// The instance as the capability it was bound to, e.g. `Arc<dyn Printer>`.
  ///
  /// Returns `None` if `I` is not the capability this instance was resolved for.
  pub fn capability<I: ?Sized + Any>(&self) -> Option<Arc<I>> {
    self.inner.view.downcast_ref::<Arc<I>>().cloned()
  }

  /// Like [`capability`](Self::capability), reporting a mismatch as [`Error::NotAnInterface`].
  pub(crate) fn into_capability<I: ?Sized + Any>(self) -> Result<Arc<I>> {
    self.capability::<I>().ok_or(Error::NotAnInterface {
      found: std::any::type_name::<I>(),
    })
  }

  /// The instance as its concrete type. Returns `None` if `C` is not the bound type.
  pub fn concrete<C: Any + Send + Sync>(&self) -> Option<Arc<C>> {
    self.inner.concrete.clone().downcast::<C>().ok()
  }

  /// Whether both handles refer to the same object.
  pub fn same_instance(&self, other: &Resolved) -> bool {
    Arc::as_ptr(&self.inner.concrete) as *const () == Arc::as_ptr(&other.inner.concrete) as *const ()
  }

  pub fn capability_name(&self) -> &'static str {
    self.capability
  }

  pub fn concrete_name(&self) -> &'static str {
    self.concrete_name
  }
}

impl fmt::Debug for Resolved {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Resolved")
      .field("capability", &self.capability)
      .field("concrete", &self.concrete_name)
      .finish()
  }
}
