//! Errors raised by registration and resolution.

use thiserror::Error;

/// Type name reported when a descriptor or instance argument is absent.
pub(crate) const ABSENT: &str = "nothing";

/// The error type for all container operations.
///
/// Every variant describes a configuration mistake rather than a transient fault, so none of
/// them are worth retrying. Type names are the ones produced by `std::any::type_name`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("abstract type must be a capability (trait object), got {found}")]
  NotAnInterface { found: &'static str },

  #[error("concrete type must be a struct or a pointer to a struct, got {found}")]
  NotAStruct { found: &'static str },

  #[error("concrete type {concrete} does not implement capability {capability}")]
  InterfaceNotImplemented {
    concrete: &'static str,
    capability: &'static str,
  },

  #[error("capability {capability} is already bound to a concrete type")]
  AlreadyRegistered { capability: &'static str },

  #[error("no concrete type supplied for capability {capability}")]
  NoConcreteTypeSupplied { capability: &'static str },

  #[error("capability {capability} was requested again while its instance was being constructed")]
  ConstructionCycle { capability: &'static str },
}

/// A specialized `Result` type for `fibre_inject` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
