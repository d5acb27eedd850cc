//! The main `Container` struct and its associated methods.

use crate::descriptor::{Describe, TypeDescriptor};
use crate::error::{Error, Result, ABSENT};
use crate::injector::Injector;
use crate::instance::{Instance, IntoInstance, Resolved};
use crate::registry::{Binding, CapabilityKey, ConstructionGuard, Materialized, Registry};
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::sync::Arc;

/// A write-once registry binding capabilities (trait objects) to lazily created singletons.
///
/// Every operation runs under one coarse lock, so registration and resolution serialize
/// against each other across all capabilities. The lock is re-entrant: an
/// [`Initialize`](crate::Initialize) hook may call back into the container on the same thread,
/// and resolving its own capability from there returns the instance being initialized.
///
/// Each operation is available twice: a typed form that infers descriptors from generics
/// (`register_type`, `register`, `inject`), and a descriptor form taking
/// `Option<&TypeDescriptor>` for capabilities chosen at runtime (`bind_type`, `bind_instance`,
/// `resolve`). A `None` argument is treated as absent.
#[derive(Default)]
pub struct Container {
  state: ReentrantMutex<RefCell<Registry>>,
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  fn require_capability(capability: Option<&TypeDescriptor>) -> Result<&TypeDescriptor> {
    match capability {
      Some(c) if c.is_capability() => Ok(c),
      Some(c) => Err(Error::NotAnInterface { found: c.name() }),
      None => Err(Error::NotAnInterface { found: ABSENT }),
    }
  }

  fn validate(
    capability: Option<&TypeDescriptor>,
    concrete: Option<&TypeDescriptor>,
  ) -> Result<(CapabilityKey, Binding)> {
    let capability = Self::require_capability(capability)?;
    let concrete = concrete.ok_or(Error::NotAStruct { found: ABSENT })?;
    let canonical = concrete
      .canonical()
      .ok_or(Error::NotAStruct {
        found: concrete.name(),
      })?;
    let implementor = capability
      .implementor(canonical.type_id())
      .ok_or(Error::InterfaceNotImplemented {
        concrete: concrete.name(),
        capability: capability.name(),
      })?;

    Ok((
      CapabilityKey::of(capability),
      Binding {
        concrete: canonical.clone(),
        upcast: implementor.upcast(),
      },
    ))
  }

  fn insert_binding(
    registry: &mut Registry,
    key: CapabilityKey,
    binding: Binding,
    instance: Option<Materialized>,
  ) -> Result<()> {
    let concrete = binding.concrete.name();
    match registry.relations.entry(key) {
      Entry::Occupied(_) => {
        tracing::warn!(capability = key.name, concrete, "capability already bound");
        return Err(Error::AlreadyRegistered {
          capability: key.name,
        });
      }
      Entry::Vacant(slot) => {
        slot.insert(binding);
      }
    }
    let eager = instance.is_some();
    if let Some(instance) = instance {
      registry.instances.insert(key, instance);
    }
    tracing::debug!(capability = key.name, concrete, eager, "bound capability");
    Ok(())
  }

  // --- DESCRIPTOR API ---

  /// Binds `capability` to the concrete type `concrete` without creating an instance.
  ///
  /// # Errors
  ///
  /// - [`Error::NotAnInterface`] if `capability` is absent or not a capability.
  /// - [`Error::NotAStruct`] if `concrete` is absent or not a struct / pointer to a struct.
  /// - [`Error::InterfaceNotImplemented`] if `concrete` is not listed for `capability`.
  /// - [`Error::AlreadyRegistered`] if `capability` already has a binding.
  pub fn bind_type(
    &self,
    capability: Option<&TypeDescriptor>,
    concrete: Option<&TypeDescriptor>,
  ) -> Result<()> {
    let (key, binding) = Self::validate(capability, concrete)?;

    let guard = self.state.lock();
    let mut registry = guard.borrow_mut();
    Self::insert_binding(&mut registry, key, binding, None)
  }

  /// Binds `capability` to a ready instance. Later resolutions return exactly this instance and
  /// never run its initialization hook.
  ///
  /// Fails exactly like [`bind_type`](Self::bind_type), with an absent `instance` reported as
  /// [`Error::NotAStruct`].
  pub fn bind_instance(
    &self,
    capability: Option<&TypeDescriptor>,
    instance: Option<Instance>,
  ) -> Result<()> {
    let (key, binding) = Self::validate(capability, instance.as_ref().map(Instance::descriptor))?;
    // `validate` only succeeds with an instance present.
    let Some(instance) = instance else {
      return Err(Error::NotAStruct { found: ABSENT });
    };

    let concrete = instance.into_value();
    let view = (binding.upcast)(concrete.clone()).ok_or(Error::InterfaceNotImplemented {
      concrete: binding.concrete.name(),
      capability: key.name,
    })?;

    let guard = self.state.lock();
    let mut registry = guard.borrow_mut();
    Self::insert_binding(
      &mut registry,
      key,
      binding,
      Some(Materialized { concrete, view }),
    )
  }

  /// Resolves the singleton bound to `capability`, constructing and initializing it on first use.
  ///
  /// # Errors
  ///
  /// - [`Error::NotAnInterface`] if `capability` is absent or not a capability. The registry is
  ///   not consulted in that case.
  /// - [`Error::NoConcreteTypeSupplied`] if nothing is bound to `capability`.
  /// - [`Error::ConstructionCycle`] if the capability's constructor, directly or through other
  ///   capabilities, resolves the capability being constructed.
  pub fn resolve(&self, capability: Option<&TypeDescriptor>) -> Result<Resolved> {
    let capability = Self::require_capability(capability)?;
    let key = CapabilityKey::of(capability);

    // Held until the hook has run, so concurrent first resolutions wait for a fully
    // initialized instance. Same-thread re-entry passes straight through.
    let guard = self.state.lock();

    // The RefCell borrow must never be held across user code (constructors, hooks).
    let binding = {
      let registry = guard.borrow();
      let binding = registry
        .relations
        .get(&key)
        .ok_or(Error::NoConcreteTypeSupplied {
          capability: key.name,
        })?;
      if let Some(existing) = registry.instances.get(&key) {
        tracing::trace!(capability = key.name, "resolved existing instance");
        return Ok(Resolved::new(
          key.name,
          binding.concrete.name(),
          existing.clone(),
        ));
      }
      binding.clone()
    };

    let concrete_name = binding.concrete.name();
    let construct = binding
      .concrete
      .constructor()
      .ok_or(Error::NotAStruct {
        found: concrete_name,
      })?;

    // A constructor resolving its own capability would otherwise build again, without end.
    let Some(constructing) = ConstructionGuard::enter(&guard, key) else {
      tracing::warn!(capability = key.name, "capability requested during its own construction");
      return Err(Error::ConstructionCycle {
        capability: key.name,
      });
    };
    let concrete = construct();
    let view = (binding.upcast)(concrete.clone()).ok_or(Error::InterfaceNotImplemented {
      concrete: concrete_name,
      capability: key.name,
    })?;

    let materialized = Materialized { concrete, view };
    guard
      .borrow_mut()
      .instances
      .insert(key, materialized.clone());
    drop(constructing);

    // Inserted before the hook runs, so a hook resolving its own capability sees this
    // instance instead of recursing.
    let hook = binding.init_hook();
    if let Some(initialize) = hook {
      initialize(&*materialized.concrete);
    }
    tracing::debug!(
      capability = key.name,
      concrete = concrete_name,
      initialized = hook.is_some(),
      "materialized instance"
    );

    Ok(Resolved::new(key.name, concrete_name, materialized))
  }

  // --- TYPED API ---

  /// Binds capability `I` (a `dyn Trait`) to the concrete type `C`.
  ///
  /// ```
  /// use fibre_inject::{capability, component, Container};
  ///
  /// trait Printer: Send + Sync {
  ///   fn print(&self, name: &str) -> String;
  /// }
  ///
  /// #[derive(Default)]
  /// struct HelloPrinter;
  ///
  /// impl Printer for HelloPrinter {
  ///   fn print(&self, name: &str) -> String {
  ///     format!("Hello World, {}!", name)
  ///   }
  /// }
  ///
  /// capability!(Printer = [HelloPrinter]);
  /// component!(HelloPrinter);
  ///
  /// let container = Container::new();
  /// container.register_type::<dyn Printer, HelloPrinter>().unwrap();
  ///
  /// let printer = container.inject::<dyn Printer>().unwrap();
  /// assert_eq!(printer.print("Diego"), "Hello World, Diego!");
  /// ```
  pub fn register_type<I, C>(&self) -> Result<()>
  where
    I: ?Sized + Describe,
    C: ?Sized + Describe,
  {
    self.bind_type(Some(&I::describe()), Some(&C::describe()))
  }

  /// Binds capability `I` to `instance`.
  ///
  /// `instance` may be a component value, which is moved into a new shared allocation, or an
  /// `Arc` or `Box` of one. An `Arc` is stored as-is, so the caller keeps a handle to it.
  pub fn register<I, C>(&self, instance: C) -> Result<()>
  where
    I: ?Sized + Describe,
    C: IntoInstance,
  {
    self.bind_instance(Some(&I::describe()), Some(Instance::new(instance)))
  }

  /// Binds capability `I` to the caller's own allocation.
  pub fn register_shared<I, C>(&self, instance: Arc<C>) -> Result<()>
  where
    I: ?Sized + Describe,
    C: Describe + Send + Sync,
  {
    self.bind_instance(Some(&I::describe()), Some(Instance::shared(instance)))
  }

  /// Resolves capability `I` as `Arc<I>`.
  pub fn inject<I>(&self) -> Result<Arc<I>>
  where
    I: ?Sized + Describe,
  {
    self.inject_resolved::<I>()?.into_capability::<I>()
  }

  /// Resolves capability `I`, keeping access to the concrete instance.
  pub fn inject_resolved<I>(&self) -> Result<Resolved>
  where
    I: ?Sized + Describe,
  {
    self.resolve(Some(&I::describe()))
  }
}

impl Injector for Container {
  fn bind_type(
    &self,
    capability: Option<&TypeDescriptor>,
    concrete: Option<&TypeDescriptor>,
  ) -> Result<()> {
    Container::bind_type(self, capability, concrete)
  }

  fn bind_instance(
    &self,
    capability: Option<&TypeDescriptor>,
    instance: Option<Instance>,
  ) -> Result<()> {
    Container::bind_instance(self, capability, instance)
  }

  fn resolve(&self, capability: Option<&TypeDescriptor>) -> Result<Resolved> {
    Container::resolve(self, capability)
  }
}
