//! Runtime type descriptors.
//!
//! A [`TypeDescriptor`] is what the container inspects when it validates a binding: what kind of
//! type it is looking at, how to build a zero value of it, and which concrete types satisfy a
//! capability. Descriptors for user types are generated by the [`capability!`](crate::capability)
//! and [`component!`](crate::component) macros; descriptors for pointers and common scalar types
//! are provided here.

use dashmap::DashMap;
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// A type-erased, shareable value.
pub type Erased = Arc<dyn Any + Send + Sync>;

/// Builds the zero value of a component.
pub type Constructor = fn() -> Erased;

/// Runs [`Initialize::initialize`] on a freshly constructed, type-erased component.
pub type InitHook = fn(&(dyn Any + Send + Sync));

/// Turns an erased concrete instance into an erased `Arc<dyn Capability>`.
///
/// Returns `None` when the erased value is not of the implementor's type.
pub type Upcast = fn(Erased) -> Option<Erased>;

/// Optional post-construction hook for container-built components.
///
/// The hook runs exactly once, right after the container allocates the zero value and before the
/// first `inject` for that capability returns. The instance is already shared at that point, so
/// the hook takes `&self`; components that need to mutate state use interior mutability.
///
/// The hook is never invoked for instances handed to the container through `register`.
pub trait Initialize {
  fn initialize(&self);
}

/// The broad category of a described type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
  /// A trait object usable as an abstract capability.
  Capability,
  /// A concrete value type the container may construct and bind.
  Struct,
  /// A reference or smart pointer wrapping another described type.
  Pointer,
  /// Anything else: scalars, strings, collections.
  Other,
}

/// A concrete type listed as satisfying a capability.
#[derive(Clone)]
pub struct Implementor {
  type_id: TypeId,
  name: &'static str,
  upcast: Upcast,
}

impl Implementor {
  pub fn new<C: Any>(upcast: Upcast) -> Self {
    Self {
      type_id: TypeId::of::<C>(),
      name: type_name::<C>(),
      upcast,
    }
  }

  pub fn type_id(&self) -> TypeId {
    self.type_id
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub(crate) fn upcast(&self) -> Upcast {
    self.upcast
  }
}

impl fmt::Debug for Implementor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Implementor").field(&self.name).finish()
  }
}

enum Shape {
  Capability {
    implementors: Vec<Implementor>,
  },
  Struct {
    construct: Constructor,
    initialize: Option<InitHook>,
  },
  Pointer {
    pointee: TypeDescriptor,
  },
  Other,
}

struct DescriptorInner {
  type_id: TypeId,
  name: &'static str,
  shape: Shape,
}

/// The runtime description of a single type.
///
/// Cloning is cheap; descriptors are reference counted.
#[derive(Clone)]
pub struct TypeDescriptor {
  inner: Arc<DescriptorInner>,
}

impl TypeDescriptor {
  fn from_parts<T: ?Sized + Any>(shape: Shape) -> Self {
    Self {
      inner: Arc::new(DescriptorInner {
        type_id: TypeId::of::<T>(),
        name: type_name::<T>(),
        shape,
      }),
    }
  }

  /// Describes a capability (`dyn Trait`) and the concrete types known to satisfy it.
  pub fn capability<T: ?Sized + Any>(implementors: Vec<Implementor>) -> Self {
    Self::from_parts::<T>(Shape::Capability { implementors })
  }

  /// Describes a constructible component.
  pub fn structure<T: Any + Send + Sync>(
    construct: Constructor,
    initialize: Option<InitHook>,
  ) -> Self {
    Self::from_parts::<T>(Shape::Struct {
      construct,
      initialize,
    })
  }

  /// Describes `P`, a pointer to the type described by `pointee`.
  pub fn pointer<P: ?Sized + Any>(pointee: TypeDescriptor) -> Self {
    Self::from_parts::<P>(Shape::Pointer { pointee })
  }

  /// Describes a type that can neither be a capability nor a component.
  pub fn other<T: ?Sized + Any>() -> Self {
    Self::from_parts::<T>(Shape::Other)
  }

  pub fn type_id(&self) -> TypeId {
    self.inner.type_id
  }

  pub fn name(&self) -> &'static str {
    self.inner.name
  }

  pub fn kind(&self) -> TypeKind {
    match self.inner.shape {
      Shape::Capability { .. } => TypeKind::Capability,
      Shape::Struct { .. } => TypeKind::Struct,
      Shape::Pointer { .. } => TypeKind::Pointer,
      Shape::Other => TypeKind::Other,
    }
  }

  pub fn is_capability(&self) -> bool {
    self.kind() == TypeKind::Capability
  }

  /// The wrapped descriptor, for pointer kinds.
  pub fn pointee(&self) -> Option<&TypeDescriptor> {
    match &self.inner.shape {
      Shape::Pointer { pointee } => Some(pointee),
      _ => None,
    }
  }

  /// The struct this descriptor stands for, with one level of pointer indirection removed.
  ///
  /// Returns `None` unless the descriptor is a struct or a pointer directly to a struct.
  pub fn canonical(&self) -> Option<&TypeDescriptor> {
    match self.kind() {
      TypeKind::Struct => Some(self),
      TypeKind::Pointer => self.pointee().filter(|p| p.kind() == TypeKind::Struct),
      _ => None,
    }
  }

  /// The concrete types listed for a capability. Empty for every other kind.
  pub fn implementors(&self) -> &[Implementor] {
    match &self.inner.shape {
      Shape::Capability { implementors } => implementors,
      _ => &[],
    }
  }

  /// Looks up `concrete` in this capability's implementor table.
  pub fn implementor(&self, concrete: TypeId) -> Option<&Implementor> {
    self.implementors().iter().find(|i| i.type_id == concrete)
  }

  /// Whether the canonical form of `concrete` is listed as satisfying this capability.
  pub fn is_implemented_by(&self, concrete: &TypeDescriptor) -> bool {
    concrete
      .canonical()
      .is_some_and(|c| self.implementor(c.type_id()).is_some())
  }

  pub(crate) fn constructor(&self) -> Option<Constructor> {
    match self.inner.shape {
      Shape::Struct { construct, .. } => Some(construct),
      _ => None,
    }
  }

  pub(crate) fn init_hook(&self) -> Option<InitHook> {
    match self.inner.shape {
      Shape::Struct { initialize, .. } => initialize,
      _ => None,
    }
  }
}

impl PartialEq for TypeDescriptor {
  fn eq(&self, other: &Self) -> bool {
    self.inner.type_id == other.inner.type_id
  }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TypeDescriptor")
      .field("name", &self.inner.name)
      .field("kind", &self.kind())
      .finish()
  }
}

/// Types that can produce their own [`TypeDescriptor`].
///
/// Implemented by [`capability!`](crate::capability) for trait objects, by
/// [`component!`](crate::component) for structs, and by this crate for pointers and scalars.
pub trait Describe: Any {
  fn describe() -> TypeDescriptor;
}

impl<T: ?Sized + Describe> Describe for Arc<T> {
  fn describe() -> TypeDescriptor {
    TypeDescriptor::pointer::<Self>(T::describe())
  }
}

impl<T: ?Sized + Describe> Describe for Box<T> {
  fn describe() -> TypeDescriptor {
    TypeDescriptor::pointer::<Self>(T::describe())
  }
}

impl<T: ?Sized + Describe> Describe for &'static T {
  fn describe() -> TypeDescriptor {
    TypeDescriptor::pointer::<Self>(T::describe())
  }
}

macro_rules! describe_other {
  ($($t:ty),* $(,)?) => {
    $(
      impl Describe for $t {
        fn describe() -> TypeDescriptor {
          TypeDescriptor::other::<$t>()
        }
      }
    )*
  };
}

describe_other!(
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
  str,
  String,
);

/// A concurrent, name-keyed table of descriptors.
///
/// Lets an application pick capabilities and implementations at runtime, for example from a
/// name read out of its own settings. A miss yields `None`, which the container's descriptor
/// surface treats as an absent argument.
#[derive(Default)]
pub struct DescriptorTable {
  by_name: DashMap<String, TypeDescriptor>,
}

impl DescriptorTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds `T` under its full `std::any::type_name`.
  pub fn add<T: ?Sized + Describe>(&self) -> &Self {
    let descriptor = T::describe();
    self.by_name.insert(descriptor.name().to_owned(), descriptor);
    self
  }

  /// Adds `descriptor` under an arbitrary `name`, replacing any previous entry.
  pub fn add_as(&self, name: &str, descriptor: TypeDescriptor) -> &Self {
    self.by_name.insert(name.to_owned(), descriptor);
    self
  }

  pub fn get(&self, name: &str) -> Option<TypeDescriptor> {
    self.by_name.get(name).map(|entry| entry.value().clone())
  }

  pub fn len(&self) -> usize {
    self.by_name.len()
  }

  pub fn is_empty(&self) -> bool {
    self.by_name.is_empty()
  }
}
