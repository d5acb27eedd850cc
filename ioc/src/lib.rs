//! # Fibre Inject
//!
//! A minimal, thread-safe dependency injection container for Rust.
//!
//! Fibre Inject binds an abstract *capability* (a trait object such as `dyn Printer`) to exactly
//! one concrete implementation, and hands out a single shared instance of it. Instances are
//! created lazily, at most once per capability, on the first `inject`.
//!
//! ## Core Concepts
//!
//! - **Capability**: a trait declared with [`capability!`], together with the concrete types
//!   that satisfy it. Only capabilities can be injected.
//! - **Component**: a `Default` struct declared with [`component!`]. The container builds it
//!   with `Default::default()` and, optionally, runs its [`Initialize`] hook once.
//! - **Write-once bindings**: each capability can be bound once, either to a type
//!   ([`Container::register_type`]) or to a ready instance ([`Container::register`]).
//! - **Global Container**: a process-wide default container, accessible via [`global()`],
//!   with free functions forwarding to it (feature `global`, on by default). Any [`Injector`]
//!   can be installed in its place.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_inject::{capability, component, inject, register_type};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! trait Printer: Send + Sync {
//!   fn print(&self, name: &str) -> String;
//!   fn uses(&self) -> usize;
//! }
//!
//! #[derive(Default)]
//! struct LoremPrinter {
//!   uses: AtomicUsize,
//! }
//!
//! impl Printer for LoremPrinter {
//!   fn print(&self, name: &str) -> String {
//!     self.uses.fetch_add(1, Ordering::SeqCst);
//!     format!("Lorem ipsum dolor sit amet, {}!", name)
//!   }
//!
//!   fn uses(&self) -> usize {
//!     self.uses.load(Ordering::SeqCst)
//!   }
//! }
//!
//! capability!(Printer = [LoremPrinter]);
//! component!(LoremPrinter);
//!
//! register_type::<dyn Printer, LoremPrinter>().unwrap();
//!
//! let first = inject::<dyn Printer>().unwrap();
//! first.print("Diego");
//!
//! let second = inject::<dyn Printer>().unwrap();
//! second.print("Garcia");
//!
//! // Both handles point at the same singleton.
//! assert_eq!(second.uses(), 2);
//! ```

mod container;
mod descriptor;
mod error;
#[cfg(feature = "global")]
mod global;
mod injector;
mod instance;
mod macros;
mod registry;

pub use container::Container;
pub use descriptor::{
  Constructor, Describe, DescriptorTable, Erased, Implementor, InitHook, Initialize,
  TypeDescriptor, TypeKind, Upcast,
};
pub use error::{Error, Result};
#[cfg(feature = "global")]
pub use global::{global, inject, inject_at, register, register_shared, register_type, replace_global};
pub use injector::Injector;
pub use instance::{Instance, IntoInstance, Resolved};

#[doc(hidden)]
pub mod __private {
  pub use once_cell::sync::Lazy;
}
