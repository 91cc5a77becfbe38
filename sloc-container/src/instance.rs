//! Resolved service instances.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, SlocError};
use crate::key::ServiceKey;

/// A type-erased service produced by the registry.
///
/// Cloning a `Service` shares the same instance. Identity is pointer
/// identity: two resolutions of a singleton key are [`Service::ptr_eq`],
/// two resolutions of a transient key are not.
///
/// # Examples
/// ```
/// use sloc_container::instance::Service;
///
/// let world = Service::new("World");
/// assert!(world.is::<&str>());
/// assert_eq!(world.downcast_ref::<&str>(), Some(&"World"));
/// assert!(world.ptr_eq(&world.clone()));
/// ```
#[derive(Clone)]
pub struct Service {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Service {
    /// Wraps a freshly produced value.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an already shared value without re-allocating.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            value,
            type_name: type_name::<T>(),
        }
    }

    /// Name of the concrete type inside.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Returns a shared handle to the instance if it is a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Returns `true` if both handles point at the same instance.
    pub fn ptr_eq(&self, other: &Service) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.value), Arc::as_ptr(&other.value))
    }

    /// Downcasts for a typed lookup of `key`.
    ///
    /// # Errors
    /// Returns [`SlocError::InvalidProvider`] when the provider bound to
    /// `key` produced something other than a `T`.
    pub(crate) fn expect<T: Any + Send + Sync>(&self, key: &ServiceKey) -> Result<Arc<T>> {
        self.downcast::<T>().ok_or_else(|| SlocError::InvalidProvider {
            key: key.clone(),
            expected: type_name::<T>(),
            produced: self.type_name,
        })
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("type", &self.type_name)
            .field("ptr", &Arc::as_ptr(&self.value).cast::<()>())
            .finish()
    }
}
