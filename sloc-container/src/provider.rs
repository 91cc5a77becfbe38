//! Providers — what a key is bound to.
//!
//! A provider is decided once, at registration time: either a factory the
//! registry invokes on each resolution, or a literal value handed back
//! verbatim.
//!
//! # Examples
//! ```
//! use sloc_container::provider::Provider;
//!
//! let greeting = Provider::factory(|| Ok("World"));
//! assert!(greeting.is_invokable());
//!
//! let constant = Provider::literal(42u16);
//! assert!(!constant.is_invokable());
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::instance::Service;
use crate::key::Constructor;
use crate::services::{Construct, Injectable, Services, construct_service};

/// Factory taking no arguments.
pub type NullaryFn = Arc<dyn Fn() -> Result<Service> + Send + Sync>;

/// Factory receiving a handle to the registry that invokes it.
pub type ServicesFn = Arc<dyn Fn(&Services) -> Result<Service> + Send + Sync>;

/// The two calling conventions a factory may use.
#[derive(Clone)]
pub enum Factory {
    /// Invoked with no arguments.
    Nullary(NullaryFn),
    /// Invoked with the resolving registry, so the product can look up
    /// its own dependencies.
    WithServices(ServicesFn),
}

/// What a key resolves through.
#[derive(Clone)]
pub enum Provider {
    /// Invoked on every resolution (once, for singletons).
    Factory(Factory),
    /// Returned as-is on every resolution.
    Literal(Service),
}

impl Provider {
    /// A zero-argument factory.
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        Provider::Factory(Factory::Nullary(Arc::new(move || factory().map(Service::new))))
    }

    /// A factory that receives the registry handle.
    pub fn with_services<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Services) -> Result<T> + Send + Sync + 'static,
    {
        Provider::Factory(Factory::WithServices(Arc::new(move |services: &Services| {
            factory(services).map(Service::new)
        })))
    }

    /// A constant binding.
    pub fn literal<T: Any + Send + Sync>(value: T) -> Self {
        Provider::Literal(Service::new(value))
    }

    /// A constant binding to an already shared value.
    pub fn shared<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Provider::Literal(Service::from_arc(value))
    }

    /// Builds `T` with [`Default::default`], no registry involved.
    pub fn default_of<T: Default + Any + Send + Sync>() -> Self {
        Self::factory(|| Ok(T::default()))
    }

    /// Builds `T` through its [`Construct`] impl, then lets it
    /// [`inject`](Construct::inject) the registry handle.
    pub fn construct<T: Construct>() -> Self {
        Self::from_constructor(construct_service::<T>)
    }

    /// Two-phase construction for [`Injectable`] types.
    ///
    /// The factory builds the value without arguments; the registry then
    /// binds the value's [`ServiceSlot`](crate::services::ServiceSlot)
    /// before handing it out.
    pub fn injectable<T, F>(factory: F) -> Self
    where
        T: Injectable,
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        Self::with_services(move |services: &Services| {
            let value = factory()?;
            value.slot().bind(services.clone());
            Ok(value)
        })
    }

    pub(crate) fn from_constructor(constructor: Constructor) -> Self {
        Provider::Factory(Factory::WithServices(Arc::new(constructor)))
    }

    /// Returns `true` for factories, `false` for literals.
    #[inline]
    pub fn is_invokable(&self) -> bool {
        matches!(self, Provider::Factory(_))
    }

    /// Short description used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Provider::Factory(Factory::Nullary(_)) => "factory",
            Provider::Factory(Factory::WithServices(_)) => "factory(services)",
            Provider::Literal(_) => "literal",
        }
    }

    /// Produces a service. Factory errors are returned untouched.
    pub(crate) fn provide(&self, services: &Services) -> Result<Service> {
        match self {
            Provider::Factory(Factory::Nullary(factory)) => factory(),
            Provider::Factory(Factory::WithServices(factory)) => factory(services),
            Provider::Literal(value) => Ok(value.clone()),
        }
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Provider::Factory(_) => write!(f, "Factory({})", self.kind()),
        }
    }
}
