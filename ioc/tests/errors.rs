use fibre_inject::{
  capability, component, Container, Describe, Error, Instance, TypeDescriptor,
};
use std::any::type_name;
use std::sync::Arc;

// --- Test Fixtures ---

trait Shape: Send + Sync {
  fn area(&self) -> f64;
}

trait Logger: Send + Sync {
  fn log(&self, message: &str) -> String;
}

// Declared as a capability but never bound anywhere.
trait Unbound: Send + Sync {}

#[derive(Default)]
struct Circle;
impl Shape for Circle {
  fn area(&self) -> f64 {
    3.0
  }
}

#[derive(Default)]
struct Square;
impl Shape for Square {
  fn area(&self) -> f64 {
    4.0
  }
}

#[derive(Default)]
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) -> String {
    format!("[console] {}", message)
  }
}

capability!(Shape = [Circle, Square]);
capability!(Logger = [ConsoleLogger]);
capability!(Unbound);
component!(Circle);
component!(Square);
component!(ConsoleLogger);

fn shape() -> TypeDescriptor {
  <dyn Shape>::describe()
}

// --- RegisterType Errors ---

#[test]
fn test_register_type_error_table() {
  let cases: Vec<(&str, Option<TypeDescriptor>, Option<TypeDescriptor>, Option<Error>)> = vec![
    ("right abstract and concrete types", Some(shape()), Some(<Arc<Circle>>::describe()), None),
    (
      "concrete type does not implement the capability",
      Some(shape()),
      Some(<Arc<ConsoleLogger>>::describe()),
      Some(Error::InterfaceNotImplemented {
        concrete: type_name::<Arc<ConsoleLogger>>(),
        capability: type_name::<dyn Shape>(),
      }),
    ),
    (
      "abstract type is not a capability",
      Some(Circle::describe()),
      Some(<Arc<Circle>>::describe()),
      Some(Error::NotAnInterface {
        found: type_name::<Circle>(),
      }),
    ),
    (
      "concrete type is a capability",
      Some(shape()),
      Some(shape()),
      Some(Error::NotAStruct {
        found: type_name::<dyn Shape>(),
      }),
    ),
    (
      "concrete type is a pointer to a capability",
      Some(shape()),
      Some(<Arc<dyn Shape>>::describe()),
      Some(Error::NotAStruct {
        found: type_name::<Arc<dyn Shape>>(),
      }),
    ),
    (
      "concrete type is a pointer to a pointer",
      Some(shape()),
      Some(<Arc<Box<Circle>>>::describe()),
      Some(Error::NotAStruct {
        found: type_name::<Arc<Box<Circle>>>(),
      }),
    ),
    (
      "concrete type is a scalar",
      Some(shape()),
      Some(String::describe()),
      Some(Error::NotAStruct {
        found: type_name::<String>(),
      }),
    ),
    (
      "absent abstract type",
      None,
      Some(<Arc<dyn Shape>>::describe()),
      Some(Error::NotAnInterface { found: "nothing" }),
    ),
    (
      "absent concrete type",
      Some(shape()),
      None,
      Some(Error::NotAStruct { found: "nothing" }),
    ),
    (
      "absent abstract and concrete types",
      None,
      None,
      Some(Error::NotAnInterface { found: "nothing" }),
    ),
  ];

  for (desc, capability, concrete, expected) in cases {
    // Each case gets a fresh container.
    let container = Container::new();

    let result = container.bind_type(capability.as_ref(), concrete.as_ref());

    assert_eq!(result.err(), expected, "case: {}", desc);
  }
}

#[test]
fn test_typed_register_type_reports_same_errors() {
  let container = Container::new();

  assert!(matches!(
    container.register_type::<dyn Shape, dyn Shape>(),
    Err(Error::NotAStruct { .. })
  ));
  assert!(matches!(
    container.register_type::<String, Circle>(),
    Err(Error::NotAnInterface { .. })
  ));
  assert!(matches!(
    container.register_type::<dyn Logger, Circle>(),
    Err(Error::InterfaceNotImplemented { .. })
  ));
  assert!(matches!(
    container.register_type::<dyn Shape, u64>(),
    Err(Error::NotAStruct { .. })
  ));
}

#[test]
fn test_second_registration_is_rejected() {
  // Arrange
  let container = Container::new();
  container.register_type::<dyn Shape, Circle>().unwrap();

  // Act
  let by_type = container.register_type::<dyn Shape, Square>();
  let same_again = container.register_type::<dyn Shape, Circle>();
  let by_instance = container.register::<dyn Shape, _>(Square);

  // Assert
  let expected = Error::AlreadyRegistered {
    capability: type_name::<dyn Shape>(),
  };
  assert_eq!(by_type, Err(expected.clone()));
  assert_eq!(same_again, Err(expected.clone()));
  assert_eq!(by_instance, Err(expected));

  // The first binding is still the one in effect.
  let resolved = container.inject_resolved::<dyn Shape>().unwrap();
  assert!(resolved.concrete::<Circle>().is_some());
  assert_eq!(resolved.capability::<dyn Shape>().unwrap().area(), 3.0);
}

#[test]
fn test_registration_after_instance_is_rejected() {
  // Arrange
  let container = Container::new();
  container.register::<dyn Logger, _>(ConsoleLogger).unwrap();

  // Act
  let result = container.register_type::<dyn Logger, ConsoleLogger>();

  // Assert
  assert!(matches!(result, Err(Error::AlreadyRegistered { .. })));
}

#[test]
fn test_failed_registration_leaves_no_binding() {
  // Arrange
  let container = Container::new();
  let _ = container.register_type::<dyn Logger, Circle>();

  // Act
  let result = container.inject::<dyn Logger>();

  // Assert
  assert!(matches!(result, Err(Error::NoConcreteTypeSupplied { .. })));
  // The capability can still be bound afterwards.
  container.register_type::<dyn Logger, ConsoleLogger>().unwrap();
}

// --- Register Errors ---

#[test]
fn test_register_error_table() {
  let logger = <dyn Logger>::describe();
  let cases: Vec<(&str, Option<&TypeDescriptor>, Option<Instance>, Option<Error>)> = vec![
    ("right abstract type and instance", Some(&logger), Some(Instance::new(ConsoleLogger)), None),
    (
      "absent abstract type",
      None,
      Some(Instance::new(ConsoleLogger)),
      Some(Error::NotAnInterface { found: "nothing" }),
    ),
    (
      "absent instance",
      Some(&logger),
      None,
      Some(Error::NotAStruct { found: "nothing" }),
    ),
    (
      "instance does not implement the capability",
      Some(&logger),
      Some(Instance::new(Circle)),
      Some(Error::InterfaceNotImplemented {
        concrete: type_name::<Circle>(),
        capability: type_name::<dyn Logger>(),
      }),
    ),
    (
      "instance is an Arc to a struct",
      Some(&logger),
      Some(Instance::new(Arc::new(ConsoleLogger))),
      None,
    ),
    (
      "instance is a Box to a struct",
      Some(&logger),
      Some(Instance::new(Box::new(ConsoleLogger))),
      None,
    ),
    (
      "pointer instance does not implement the capability",
      Some(&logger),
      Some(Instance::new(Box::new(Circle))),
      Some(Error::InterfaceNotImplemented {
        concrete: type_name::<Box<Circle>>(),
        capability: type_name::<dyn Logger>(),
      }),
    ),
    (
      "instance is a pointer to a pointer",
      Some(&logger),
      Some(Instance::new(Arc::new(Box::new(ConsoleLogger)))),
      Some(Error::NotAStruct {
        found: type_name::<Arc<Box<ConsoleLogger>>>(),
      }),
    ),
    (
      "instance is a scalar",
      Some(&logger),
      Some(Instance::new(String::from("not a logger"))),
      Some(Error::NotAStruct {
        found: type_name::<String>(),
      }),
    ),
  ];

  for (desc, capability, instance, expected) in cases {
    let container = Container::new();

    let result = container.bind_instance(capability, instance);

    assert_eq!(result.err(), expected, "case: {}", desc);
  }
}

#[test]
fn test_typed_register_with_non_capability_fails() {
  let container = Container::new();

  let result = container.register::<String, _>(String::from("value"));

  assert_eq!(
    result,
    Err(Error::NotAnInterface {
      found: type_name::<String>(),
    })
  );
}

#[test]
fn test_typed_register_reports_the_callers_type() {
  let container = Container::new();

  assert_eq!(
    container.register::<dyn Logger, _>(7u32),
    Err(Error::NotAStruct {
      found: type_name::<u32>(),
    })
  );
  assert_eq!(
    container.register::<dyn Logger, _>(Square),
    Err(Error::InterfaceNotImplemented {
      concrete: type_name::<Square>(),
      capability: type_name::<dyn Logger>(),
    })
  );
  assert_eq!(
    container.register::<dyn Logger, _>(Arc::new(Box::new(ConsoleLogger))),
    Err(Error::NotAStruct {
      found: type_name::<Arc<Box<ConsoleLogger>>>(),
    })
  );
}

#[test]
fn test_typed_register_accepts_pointers_to_structs() {
  let by_arc = Container::new();
  let by_box = Container::new();

  by_arc.register::<dyn Logger, _>(Arc::new(ConsoleLogger)).unwrap();
  by_box.register::<dyn Logger, _>(Box::new(ConsoleLogger)).unwrap();

  assert_eq!(by_arc.inject::<dyn Logger>().unwrap().log("a"), "[console] a");
  assert_eq!(by_box.inject::<dyn Logger>().unwrap().log("b"), "[console] b");
  assert!(by_box
    .inject_resolved::<dyn Logger>()
    .unwrap()
    .concrete::<ConsoleLogger>()
    .is_some());
}

// --- Inject Errors ---

#[test]
fn test_inject_error_table() {
  // Arrange: one container shared by every case.
  let container = Container::new();
  container.register_type::<dyn Shape, Circle>().unwrap();

  let cases: Vec<(&str, Option<TypeDescriptor>, Option<Error>)> = vec![
    ("existent capability", Some(shape()), None),
    (
      "nonexistent capability",
      Some(<dyn Unbound>::describe()),
      Some(Error::NoConcreteTypeSupplied {
        capability: type_name::<dyn Unbound>(),
      }),
    ),
    (
      "non capability type",
      Some(<Arc<Circle>>::describe()),
      Some(Error::NotAnInterface {
        found: type_name::<Arc<Circle>>(),
      }),
    ),
    (
      "absent type",
      None,
      Some(Error::NotAnInterface { found: "nothing" }),
    ),
  ];

  for (desc, capability, expected) in cases {
    let result = container.resolve(capability.as_ref());

    assert_eq!(result.err(), expected, "case: {}", desc);
  }
}

#[test]
fn test_inject_rejects_non_capabilities_before_lookup() {
  // Nothing is bound at all, yet the capability check wins.
  let container = Container::new();

  assert!(matches!(
    container.inject::<Circle>(),
    Err(Error::NotAnInterface { .. })
  ));
  assert!(matches!(
    container.inject::<Arc<dyn Shape>>(),
    Err(Error::NotAnInterface { .. })
  ));
  assert!(matches!(
    container.resolve(None),
    Err(Error::NotAnInterface { .. })
  ));
  assert!(matches!(
    container.inject::<dyn Shape>(),
    Err(Error::NoConcreteTypeSupplied { .. })
  ));
}

#[test]
fn test_error_messages_name_the_types() {
  let container = Container::new();

  let not_implemented = container
    .register_type::<dyn Logger, Square>()
    .unwrap_err()
    .to_string();
  assert!(not_implemented.contains(type_name::<Square>()));
  assert!(not_implemented.contains(type_name::<dyn Logger>()));

  let missing = container.inject::<dyn Unbound>().err().unwrap().to_string();
  assert!(missing.contains("no concrete type supplied"));
  assert!(missing.contains(type_name::<dyn Unbound>()));
}
