//! Non-public bookkeeping records shared by the container and its handles.

use crate::descriptor::{Erased, InitHook, TypeDescriptor, Upcast};
use std::any::TypeId;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Map key for both the relation and instance maps.
///
/// Equality and hashing only look at the `TypeId`; the name is carried for diagnostics.
#[derive(Clone, Copy)]
pub(crate) struct CapabilityKey {
  pub(crate) type_id: TypeId,
  pub(crate) name: &'static str,
}

impl CapabilityKey {
  pub(crate) fn of(capability: &TypeDescriptor) -> Self {
    Self {
      type_id: capability.type_id(),
      name: capability.name(),
    }
  }
}

impl PartialEq for CapabilityKey {
  fn eq(&self, other: &Self) -> bool {
    self.type_id == other.type_id
  }
}

impl Eq for CapabilityKey {}

impl Hash for CapabilityKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_id.hash(state);
  }
}

impl fmt::Debug for CapabilityKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Key({})", self.name)
  }
}

/// A validated capability → concrete relation. Never mutated once stored.
#[derive(Clone)]
pub(crate) struct Binding {
  /// Always the canonical struct descriptor, pointer indirection stripped.
  pub(crate) concrete: TypeDescriptor,
  pub(crate) upcast: Upcast,
}

impl Binding {
  pub(crate) fn init_hook(&self) -> Option<InitHook> {
    self.concrete.init_hook()
  }
}

/// The singleton for one capability: the concrete value and its capability view.
///
/// `view` holds an `Arc<dyn Capability>` pointing at the same allocation as `concrete`.
#[derive(Clone)]
pub(crate) struct Materialized {
  pub(crate) concrete: Erased,
  pub(crate) view: Erased,
}

#[derive(Default)]
pub(crate) struct Registry {
  pub(crate) relations: HashMap<CapabilityKey, Binding>,
  pub(crate) instances: HashMap<CapabilityKey, Materialized>,
  /// Capabilities whose zero value is being built right now.
  pub(crate) constructing: HashSet<CapabilityKey>,
}

/// Marks a capability as under construction until dropped.
///
/// Dropping also runs when the constructor panics, so a failed construction can be retried.
pub(crate) struct ConstructionGuard<'a> {
  registry: &'a RefCell<Registry>,
  key: CapabilityKey,
}

impl<'a> ConstructionGuard<'a> {
  /// Returns `None` if `key` is already being constructed.
  pub(crate) fn enter(registry: &'a RefCell<Registry>, key: CapabilityKey) -> Option<Self> {
    if !registry.borrow_mut().constructing.insert(key) {
      return None;
    }
    Some(Self { registry, key })
  }
}

impl Drop for ConstructionGuard<'_> {
  fn drop(&mut self) {
    self.registry.borrow_mut().constructing.remove(&self.key);
  }
}
