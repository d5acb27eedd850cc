//! Public macros for declaring capabilities and components, and for resolving them.

/// Declares a trait as a capability and lists the concrete types that satisfy it.
///
/// Generates `Describe for dyn Trait`. Each listed type is coerced to `Arc<dyn Trait>`, so a type
/// that does not implement the trait is a compile error. The trait must be `Send + Sync`
/// (usually as supertraits) for its trait objects to be stored in the container.
///
/// ```
/// use fibre_inject::{capability, component, Container};
///
/// trait Shape: Send + Sync {
///   fn area(&self) -> f64;
/// }
///
/// #[derive(Default)]
/// struct Square;
/// impl Shape for Square {
///   fn area(&self) -> f64 { 4.0 }
/// }
///
/// #[derive(Default)]
/// struct Circle;
/// impl Shape for Circle {
///   fn area(&self) -> f64 { 3.14 }
/// }
///
/// capability!(Shape = [Square, Circle]);
/// component!(Square);
/// component!(Circle);
///
/// let container = Container::new();
/// container.register_type::<dyn Shape, Circle>().unwrap();
/// assert!(container.register_type::<dyn Shape, Square>().is_err());
/// ```
#[macro_export]
macro_rules! capability {
  ($cap:path = [$($concrete:ty),* $(,)?]) => {
    impl $crate::Describe for dyn $cap {
      fn describe() -> $crate::TypeDescriptor {
        static DESCRIPTOR: $crate::__private::Lazy<$crate::TypeDescriptor> =
          $crate::__private::Lazy::new(|| {
            $crate::TypeDescriptor::capability::<dyn $cap>(::std::vec![
              $(
                $crate::Implementor::new::<$concrete>(|erased: $crate::Erased| {
                  let concrete = erased.downcast::<$concrete>().ok()?;
                  let view: ::std::sync::Arc<dyn $cap> = concrete;
                  ::std::option::Option::Some(::std::sync::Arc::new(view) as $crate::Erased)
                }),
              )*
            ])
          });
        ::std::clone::Clone::clone(&*DESCRIPTOR)
      }
    }
  };

  ($cap:path) => {
    $crate::capability!($cap = []);
  };
}

/// Declares a struct the container can construct and bind.
///
/// The zero value is `Default::default()`. Pass `initialize` to have the container call
/// [`Initialize::initialize`](crate::Initialize::initialize) once after constructing it. Also
/// implements [`IntoInstance`](crate::IntoInstance), so values can be passed to `register`.
///
/// ```
/// use fibre_inject::{capability, component, Container, Initialize};
/// use std::sync::atomic::{AtomicBool, Ordering};
///
/// trait Cache: Send + Sync {
///   fn is_warm(&self) -> bool;
/// }
///
/// #[derive(Default)]
/// struct MemoryCache {
///   warm: AtomicBool,
/// }
///
/// impl Cache for MemoryCache {
///   fn is_warm(&self) -> bool {
///     self.warm.load(Ordering::SeqCst)
///   }
/// }
///
/// impl Initialize for MemoryCache {
///   fn initialize(&self) {
///     self.warm.store(true, Ordering::SeqCst);
///   }
/// }
///
/// capability!(Cache = [MemoryCache]);
/// component!(MemoryCache, initialize);
///
/// let container = Container::new();
/// container.register_type::<dyn Cache, MemoryCache>().unwrap();
/// assert!(container.inject::<dyn Cache>().unwrap().is_warm());
/// ```
#[macro_export]
macro_rules! component {
  (@describe $concrete:ty, $hook:expr) => {
    impl $crate::Describe for $concrete {
      fn describe() -> $crate::TypeDescriptor {
        static DESCRIPTOR: $crate::__private::Lazy<$crate::TypeDescriptor> =
          $crate::__private::Lazy::new(|| {
            $crate::TypeDescriptor::structure::<$concrete>(
              || {
                ::std::sync::Arc::new(<$concrete as ::std::default::Default>::default())
                  as $crate::Erased
              },
              $hook,
            )
          });
        ::std::clone::Clone::clone(&*DESCRIPTOR)
      }
    }

    impl $crate::IntoInstance for $concrete {
      fn into_instance(self) -> $crate::Instance {
        $crate::Instance::from_value(self)
      }
    }
  };

  ($concrete:ty, initialize) => {
    $crate::component!(
      @describe $concrete,
      ::std::option::Option::Some(|erased: &(dyn ::std::any::Any + Send + Sync)| {
        if let ::std::option::Option::Some(instance) = erased.downcast_ref::<$concrete>() {
          <$concrete as $crate::Initialize>::initialize(instance);
        }
      })
    );
  };

  ($concrete:ty) => {
    $crate::component!(@describe $concrete, ::std::option::Option::None);
  };
}

/// Resolves a capability, panicking if it cannot be resolved.
///
/// Misconfiguration is a programmer error, so call sites that treat it as fatal can use this
/// instead of handling the `Result` from `inject`.
///
/// # Panics
///
/// Panics with the underlying [`Error`](crate::Error) if resolution fails. For a non-panicking
/// version, use `inject::<dyn Trait>()` directly.
///
/// # Examples
///
/// ```
/// use fibre_inject::{capability, component, inject, Container};
///
/// trait Greeter: Send + Sync {
///   fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter {
///   fn greet(&self) -> String { "Hello!".to_string() }
/// }
///
/// capability!(Greeter = [EnglishGreeter]);
/// component!(EnglishGreeter);
///
/// let container = Container::new();
/// container.register_type::<dyn Greeter, EnglishGreeter>().unwrap();
///
/// let greeter = inject!(container, trait Greeter);
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! inject {
  // Arm for the default container: inject!(trait MyTrait)
  (trait $cap:path) => {
    $crate::inject::<dyn $cap>().unwrap_or_else(|err| {
      panic!("Failed to inject required capability: {}", err)
    })
  };

  // Arm for an explicit container: inject!(container, trait MyTrait)
  ($container:expr, trait $cap:path) => {
    $container.inject::<dyn $cap>().unwrap_or_else(|err| {
      panic!("Failed to inject required capability: {}", err)
    })
  };
}
