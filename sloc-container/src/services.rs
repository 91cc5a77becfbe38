//! The injectable capability.
//!
//! Objects built by a [`Registry`](crate::registry::Registry) can reach back
//! into it to resolve their own dependencies:
//!
//! - [`Construct`] types receive a [`Services`] handle *during* construction
//!   and are what an unregistered type key falls back to;
//! - [`Injectable`] types keep the handle in a [`ServiceSlot`] and expose it
//!   afterwards through [`Injectable::services`].
//!
//! # Examples
//! ```
//! use std::sync::Arc;
//! use sloc_container::prelude::*;
//!
//! struct Engine;
//!
//! impl Construct for Engine {
//!     fn construct(_: &Services) -> Result<Self> {
//!         Ok(Engine)
//!     }
//! }
//!
//! struct Car {
//!     engine: Arc<Engine>,
//!     slot: ServiceSlot,
//! }
//!
//! impl Construct for Car {
//!     fn construct(services: &Services) -> Result<Self> {
//!         Ok(Car {
//!             engine: services.get::<Engine>()?,
//!             slot: ServiceSlot::bound(services),
//!         })
//!     }
//! }
//!
//! impl Injectable for Car {
//!     fn slot(&self) -> &ServiceSlot {
//!         &self.slot
//!     }
//! }
//!
//! let registry = Registry::new();
//! let car = registry.get::<Car>().unwrap();
//! let spare = car.services().unwrap().get::<Engine>().unwrap();
//! assert!(!Arc::ptr_eq(&car.engine, &spare));
//! ```

use std::any::{Any, type_name};
use std::fmt;
use std::sync::{Arc, Weak};

use once_cell::sync::OnceCell;

use crate::error::{Result, SlocError};
use crate::instance::Service;
use crate::key::ServiceKey;
use crate::registry::Inner;

/// A type that can act as its own provider.
///
/// `construct` runs every time the type is resolved through an unregistered
/// key (or through [`Provider::construct`](crate::provider::Provider::construct)).
/// It may resolve further services from `services`.
pub trait Construct: Any + Send + Sync + Sized {
    fn construct(services: &Services) -> Result<Self>;

    /// Runs after `construct`, before the value leaves the registry.
    ///
    /// [`Injectable`] types override this to bind their slot:
    ///
    /// ```rust,ignore
    /// fn inject(&self, services: &Services) {
    ///     self.slot().bind(services.clone());
    /// }
    /// ```
    fn inject(&self, _services: &Services) {}
}

/// Builds `T` and wires it to the registry; the provider behind
/// constructible keys and [`Provider::construct`](crate::provider::Provider::construct).
pub(crate) fn construct_service<T: Construct>(services: &Services) -> Result<Service> {
    let value = T::construct(services)?;
    value.inject(services);
    Ok(Service::new(value))
}

/// A type that keeps a back-reference to the registry that built it.
pub trait Injectable: Any + Send + Sync {
    /// The slot holding the back-reference.
    fn slot(&self) -> &ServiceSlot;

    /// Handle to the originating registry.
    ///
    /// # Errors
    /// [`SlocError::NotInjected`] if the value was built outside a registry.
    fn services(&self) -> Result<Services> {
        self.slot().get().cloned().ok_or(SlocError::NotInjected {
            type_name: type_name::<Self>(),
        })
    }
}

/// Non-owning handle to a registry.
///
/// Handed to factories and constructors, and stored by injectable types.
/// It does not keep the registry alive; resolving through a handle whose
/// registry is gone fails with [`SlocError::RegistryDropped`].
#[derive(Clone)]
pub struct Services {
    registry: Weak<Inner>,
}

impl Services {
    pub(crate) fn new(registry: Weak<Inner>) -> Self {
        Self { registry }
    }

    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        Self { registry: Weak::new() }
    }

    fn upgrade(&self) -> Result<Arc<Inner>> {
        self.registry.upgrade().ok_or(SlocError::RegistryDropped)
    }

    /// Resolves `key` on the originating registry.
    pub fn resolve(&self, key: impl Into<ServiceKey>) -> Result<Service> {
        self.upgrade()?.resolve(&key.into())
    }

    /// Resolves `key` and downcasts the result to `T`.
    pub fn resolve_as<T: Any + Send + Sync>(&self, key: impl Into<ServiceKey>) -> Result<Arc<T>> {
        let key = key.into();
        self.upgrade()?.resolve(&key)?.expect::<T>(&key)
    }

    /// Resolves `T` by type, constructing it when nothing is registered.
    pub fn get<T: Construct>(&self) -> Result<Arc<T>> {
        self.resolve_as::<T>(ServiceKey::constructible::<T>())
    }

    /// Indexed-style lookup: `services.at(key).get()` is `services.resolve(key)`.
    pub fn at(&self, key: impl Into<ServiceKey>) -> Lookup {
        Lookup {
            services: self.clone(),
            key: key.into(),
        }
    }

    /// Returns `true` while the originating registry exists.
    pub fn is_alive(&self) -> bool {
        self.registry.strong_count() > 0
    }

    /// Returns `true` if both handles refer to the same registry.
    pub fn same_registry(&self, other: &Services) -> bool {
        Weak::ptr_eq(&self.registry, &other.registry)
    }
}

impl fmt::Debug for Services {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Services")
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// A pending lookup of one key, resolved by calling [`Lookup::get`].
///
/// Produced by [`Registry::at`](crate::registry::Registry::at) and
/// [`Services::at`]; it is the bracket-access form of `resolve`.
#[derive(Debug, Clone)]
pub struct Lookup {
    services: Services,
    key: ServiceKey,
}

impl Lookup {
    pub fn key(&self) -> &ServiceKey {
        &self.key
    }

    /// Same contract as `resolve`.
    pub fn get(&self) -> Result<Service> {
        self.services.resolve(&self.key)
    }

    pub fn get_as<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
        self.services.resolve_as::<T>(&self.key)
    }
}

/// Settable-once storage for a [`Services`] handle.
///
/// The first [`bind`](ServiceSlot::bind) wins; later binds are ignored so a
/// value cannot be moved to another registry after construction.
#[derive(Debug, Clone, Default)]
pub struct ServiceSlot {
    cell: OnceCell<Services>,
}

impl ServiceSlot {
    /// An empty slot, to be bound after construction.
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot bound during construction.
    pub fn bound(services: &Services) -> Self {
        Self {
            cell: OnceCell::with_value(services.clone()),
        }
    }

    /// Binds the slot. Returns `false` if it was already bound.
    pub fn bind(&self, services: Services) -> bool {
        self.cell.set(services).is_ok()
    }

    pub fn get(&self) -> Option<&Services> {
        self.cell.get()
    }

    pub fn is_bound(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    struct Orphan {
        slot: ServiceSlot,
    }

    impl Injectable for Orphan {
        fn slot(&self) -> &ServiceSlot {
            &self.slot
        }
    }

    /// Leaves its slot empty in `construct`; relies on `inject`.
    struct Deferred {
        slot: ServiceSlot,
    }

    impl Construct for Deferred {
        fn construct(_: &Services) -> Result<Self> {
            Ok(Deferred {
                slot: ServiceSlot::new(),
            })
        }

        fn inject(&self, services: &Services) {
            self.slot().bind(services.clone());
        }
    }

    impl Injectable for Deferred {
        fn slot(&self) -> &ServiceSlot {
            &self.slot
        }
    }

    #[test]
    fn self_constructed_injectable_is_bound_by_registry() {
        let registry = Registry::new();
        let deferred = registry.get::<Deferred>().unwrap();

        let services = deferred.services().unwrap();
        assert!(services.same_registry(&registry.services()));
    }

    #[test]
    fn registered_constructor_binds_injectable() {
        let registry = Registry::new();
        registry.register_type::<Deferred>("deferred", false);

        let deferred = registry.resolve_as::<Deferred>("deferred").unwrap();
        assert!(deferred.services().unwrap().is_alive());
    }

    #[test]
    fn inject_does_not_rebind_a_bound_slot() {
        let registry = Registry::new();
        let other = Registry::new();
        let deferred = Deferred {
            slot: ServiceSlot::bound(&other.services()),
        };
        deferred.inject(&registry.services());

        assert!(deferred.services().unwrap().same_registry(&other.services()));
    }

    #[test]
    fn detached_handle_reports_dropped_registry() {
        let services = Services::detached();
        assert!(!services.is_alive());
        assert!(matches!(
            services.resolve("anything"),
            Err(SlocError::RegistryDropped)
        ));
    }

    #[test]
    fn slot_binds_once() {
        let slot = ServiceSlot::new();
        assert!(!slot.is_bound());
        assert!(slot.bind(Services::detached()));
        assert!(!slot.bind(Services::detached()));
        assert!(slot.is_bound());
    }

    #[test]
    fn unbound_injectable_has_no_services() {
        let orphan = Orphan {
            slot: ServiceSlot::new(),
        };
        match orphan.services() {
            Err(SlocError::NotInjected { type_name }) => assert!(type_name.contains("Orphan")),
            other => panic!("Expected NotInjected, got: {other:?}"),
        }
    }
}
