//! End-to-end behaviour of the service locator.

mod common;

use std::sync::Arc;

use sloc::prelude::*;

struct A {
    slot: ServiceSlot,
}

impl Construct for A {
    fn construct(services: &Services) -> Result<Self> {
        Ok(A {
            slot: ServiceSlot::bound(services),
        })
    }
}

impl Injectable for A {
    fn slot(&self) -> &ServiceSlot {
        &self.slot
    }
}

struct B {
    slot: ServiceSlot,
}

impl Construct for B {
    fn construct(services: &Services) -> Result<Self> {
        Ok(B {
            slot: ServiceSlot::bound(services),
        })
    }
}

impl Injectable for B {
    fn slot(&self) -> &ServiceSlot {
        &self.slot
    }
}

/// Looks up its own dependency while being constructed.
struct C {
    a: Service,
    slot: ServiceSlot,
}

impl Construct for C {
    fn construct(services: &Services) -> Result<Self> {
        let a = services.at(ServiceKey::constructible::<A>()).get()?;
        Ok(C {
            a,
            slot: ServiceSlot::bound(services),
        })
    }
}

impl Injectable for C {
    fn slot(&self) -> &ServiceSlot {
        &self.slot
    }
}

fn key_a() -> ServiceKey {
    ServiceKey::constructible::<A>()
}

#[test]
fn locate_unregistered_type() {
    common::init_tracing();
    let registry = Registry::new();

    let a = registry.get::<A>().unwrap();
    assert!(a.services().unwrap().is_alive());
}

#[test]
fn locate_b_from_a() {
    common::init_tracing();
    let registry = Registry::new();
    registry.register_type::<B>(ServiceKey::of::<A>(), false);

    let a = registry.at(key_a()).get().unwrap();
    assert!(a.is::<B>());
    assert!(!a.is::<A>());
}

#[test]
fn locate_b_from_a_services() {
    common::init_tracing();
    let registry = Registry::new();
    registry.register_type::<A>(ServiceKey::of::<B>(), false);

    let a = registry.get::<A>().unwrap();
    let b = a.services().unwrap().at(ServiceKey::of::<B>()).get().unwrap();
    assert!(b.is::<A>());
}

#[test]
fn locate_singleton() {
    common::init_tracing();
    let registry = Registry::new();
    registry.register_type::<A>(key_a(), true);

    let a = registry.get::<A>().unwrap();
    let b = registry.get::<A>().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn locate_non_singleton() {
    common::init_tracing();
    let registry = Registry::new();

    let a = registry.resolve(key_a()).unwrap();
    let b = registry.resolve(key_a()).unwrap();
    assert!(!a.ptr_eq(&b));
}

#[test]
fn locate_non_callable() {
    common::init_tracing();
    let registry = Registry::new();
    registry.register("Hello", Provider::literal("World"), false);

    let first = registry.resolve("Hello").unwrap();
    let second = registry.resolve("Hello").unwrap();
    assert_eq!(first.downcast_ref::<&str>(), Some(&"World"));
    assert!(first.ptr_eq(&second));
}

#[test]
fn constructor_resolves_dependencies() {
    common::init_tracing();
    let registry = Registry::new();

    let c = registry.get::<C>().unwrap();
    assert!(c.a.is::<A>());

    let services = c.services().unwrap();
    assert!(services.same_registry(&registry.services()));
}

#[test]
fn lambda_provider() {
    common::init_tracing();
    let registry = Registry::new();
    registry.register("Hello", Provider::factory(|| Ok("World")), false);

    let hello = registry.resolve_as::<&str>("Hello").unwrap();
    assert_eq!(*hello, "World");
}

#[test]
fn reregistering_a_cached_singleton_uses_new_provider() {
    common::init_tracing();
    let registry = Registry::new();
    registry.register_singleton(key_a(), Provider::construct::<A>());
    let stale = registry.resolve(key_a()).unwrap();
    assert!(stale.is::<A>());

    registry.register_singleton(key_a(), Provider::construct::<B>());
    let fresh = registry.resolve(key_a()).unwrap();
    assert!(fresh.is::<B>());
    assert!(fresh.ptr_eq(&registry.resolve(key_a()).unwrap()));
}

#[test]
fn unregistered_name_is_key_not_found() {
    common::init_tracing();
    let registry = Registry::new();
    registry.register_literal("Hello", "World");

    match registry.resolve("Helo").unwrap_err() {
        SlocError::KeyNotFound(err) => {
            assert_eq!(err.suggestions, vec!["Hello"]);
        }
        other => panic!("Expected KeyNotFound, got: {other:?}"),
    }
}

#[test]
fn typed_lookup_of_rebound_type_is_invalid_provider() {
    common::init_tracing();
    let registry = Registry::new();
    registry.register_type::<B>(ServiceKey::of::<A>(), false);

    assert!(matches!(
        registry.get::<A>(),
        Err(SlocError::InvalidProvider { .. })
    ));
}

/// Builds with an empty slot; the registry binds it through `inject`.
struct Late {
    slot: ServiceSlot,
}

impl Construct for Late {
    fn construct(_: &Services) -> Result<Self> {
        Ok(Late {
            slot: ServiceSlot::new(),
        })
    }

    fn inject(&self, services: &Services) {
        self.slot().bind(services.clone());
    }
}

impl Injectable for Late {
    fn slot(&self) -> &ServiceSlot {
        &self.slot
    }
}

#[test]
fn registry_binds_injectable_after_construction() {
    common::init_tracing();
    let registry = Registry::new();
    registry.register_type::<Late>("late", false);

    let by_type = registry.get::<Late>().unwrap();
    let by_name = registry.resolve_as::<Late>("late").unwrap();

    assert!(by_type.services().unwrap().same_registry(&registry.services()));
    assert!(by_name.services().unwrap().same_registry(&registry.services()));
}
