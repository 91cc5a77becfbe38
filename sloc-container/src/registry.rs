//! # The Registry — heart of sloc
//!
//! Maps [`ServiceKey`]s to [`Provider`]s and caches singletons.
//!
//! # Resolution
//! ```text
//! resolve(key)
//!   ├─ cached singleton?  ──yes──> return it
//!   ├─ registration?      ──no───> key invokable? construct it : KeyNotFound
//!   ├─ invoke provider (lock released, may resolve re-entrantly)
//!   └─ singleton?         ──yes──> cache, unless re-registered meanwhile
//! ```
//!
//! # Examples
//! ```rust
//! use sloc_container::prelude::*;
//!
//! let registry = Registry::new();
//! registry.register("Hello", Provider::factory(|| Ok("World")), false);
//!
//! let hello = registry.resolve("Hello").unwrap();
//! assert_eq!(hello.downcast_ref::<&str>(), Some(&"World"));
//! ```

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use sloc_support::rendering::suggest_similar;
use tracing::{debug, info, instrument, trace, warn};

use crate::error::{AlreadyRegisteredError, KeyNotFoundError, Result, SlocError};
use crate::instance::Service;
use crate::key::ServiceKey;
use crate::lifetime::Lifetime;
use crate::module::ServiceModule;
use crate::provider::Provider;
use crate::services::{Construct, Lookup, Services};

// ═══════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════

/// Registry behaviour switches, set through [`RegistryBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Whether `register` may replace an existing registration.
    pub allow_override: bool,
    /// Whether unregistered invokable keys construct themselves.
    pub self_construct: bool,
    /// How many "did you mean?" suggestions a KeyNotFound error carries.
    pub max_suggestions: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            allow_override: true,
            self_construct: true,
            max_suggestions: 3,
        }
    }
}

// ═══════════════════════════════════════════
// RegistryBuilder
// ═══════════════════════════════════════════

/// Builds a [`Registry`] with configuration and initial registrations.
///
/// # Examples
/// ```rust
/// use sloc_container::prelude::*;
///
/// let registry = Registry::builder()
///     .self_construct(false)
///     .literal("database_url", "postgres://localhost")
///     .singleton("pool_size", || Ok(16usize))
///     .build()
///     .unwrap();
///
/// assert_eq!(registry.len(), 2);
/// ```
pub struct RegistryBuilder {
    config: RegistryConfig,
    pending: Vec<(ServiceKey, Provider, Lifetime)>,
}

impl RegistryBuilder {
    fn new() -> Self {
        Self {
            config: RegistryConfig::default(),
            pending: Vec::new(),
        }
    }

    /// Allow `register` to replace earlier registrations (default `true`).
    pub fn allow_override(mut self, allow: bool) -> Self {
        self.config.allow_override = allow;
        self
    }

    /// Let unregistered invokable keys construct themselves (default `true`).
    pub fn self_construct(mut self, enabled: bool) -> Self {
        self.config.self_construct = enabled;
        self
    }

    pub fn max_suggestions(mut self, max: usize) -> Self {
        self.config.max_suggestions = max;
        self
    }

    /// Queue a registration.
    pub fn register(
        mut self,
        key: impl Into<ServiceKey>,
        provider: Provider,
        singleton: bool,
    ) -> Self {
        self.pending.push((key.into(), provider, Lifetime::from(singleton)));
        self
    }

    /// Queue a transient zero-argument factory.
    pub fn factory<T, F>(self, key: impl Into<ServiceKey>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        self.register(key, Provider::factory(factory), false)
    }

    /// Queue a singleton zero-argument factory.
    pub fn singleton<T, F>(self, key: impl Into<ServiceKey>, factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        self.register(key, Provider::factory(factory), true)
    }

    /// Queue a constant binding.
    pub fn literal<T: Any + Send + Sync>(self, key: impl Into<ServiceKey>, value: T) -> Self {
        self.register(key, Provider::literal(value), false)
    }

    /// Build the registry.
    ///
    /// # Errors
    /// [`SlocError::AlreadyRegistered`] if a key was queued twice while
    /// overrides are disabled.
    #[instrument(skip(self), name = "registry_build")]
    pub fn build(self) -> Result<Registry> {
        info!(queued = self.pending.len(), "Building registry");

        let registry = Registry::with_config(self.config);
        for (key, provider, lifetime) in self.pending {
            registry.inner.insert(key, provider, lifetime, self.config.allow_override)?;
        }

        Ok(registry)
    }
}

// ═══════════════════════════════════════════
// Registry state
// ═══════════════════════════════════════════

/// Registration entry for a single key.
#[derive(Clone)]
struct Registration {
    provider: Provider,
    lifetime: Lifetime,
    /// Changes on every (re-)registration; guards the singleton cache.
    generation: u64,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("provider", &self.provider.kind())
            .field("lifetime", &self.lifetime)
            .field("generation", &self.generation)
            .finish()
    }
}

#[derive(Debug, Default)]
struct State {
    registrations: HashMap<ServiceKey, Registration>,
    singletons: HashMap<ServiceKey, Service>,
    next_generation: u64,
}

/// What `resolve` does once the lock is released.
struct Plan {
    provider: Provider,
    lifetime: Lifetime,
    generation: Option<u64>,
}

/// Shared core of a [`Registry`]; [`Services`] handles point here weakly.
pub(crate) struct Inner {
    state: Mutex<State>,
    config: RegistryConfig,
}

impl Inner {
    /// Stores a registration. The lock is never held across provider calls.
    fn insert(
        &self,
        key: ServiceKey,
        provider: Provider,
        lifetime: Lifetime,
        allow_override: bool,
    ) -> Result<()> {
        let mut state = self.state.lock();

        if !allow_override && state.registrations.contains_key(&key) {
            return Err(SlocError::AlreadyRegistered(AlreadyRegisteredError { key }));
        }

        state.next_generation += 1;
        let generation = state.next_generation;

        if state.singletons.remove(&key).is_some() {
            debug!(key = %key, "Evicted cached singleton");
        }

        debug!(key = %key, provider = provider.kind(), lifetime = %lifetime, "Registered service");
        state.registrations.insert(
            key,
            Registration {
                provider,
                lifetime,
                generation,
            },
        );
        Ok(())
    }

    /// Resolves `key`; the algorithm described in the module docs.
    #[instrument(level = "trace", skip_all, fields(key = %key))]
    pub(crate) fn resolve(self: &Arc<Self>, key: &ServiceKey) -> Result<Service> {
        let plan = {
            let state = self.state.lock();

            if let Some(cached) = state.singletons.get(key) {
                trace!("Singleton cache hit");
                return Ok(cached.clone());
            }

            match state.registrations.get(key) {
                Some(registration) => Plan {
                    provider: registration.provider.clone(),
                    lifetime: registration.lifetime,
                    generation: Some(registration.generation),
                },
                None => match key.constructor() {
                    Some(constructor) if self.config.self_construct => {
                        trace!("Unregistered key, constructing it directly");
                        Plan {
                            provider: Provider::from_constructor(constructor),
                            lifetime: Lifetime::Transient,
                            generation: None,
                        }
                    }
                    _ => return Err(self.not_found(key, &state)),
                },
            }
        };

        trace!(provider = plan.provider.kind(), lifetime = %plan.lifetime, "Invoking provider");
        let services = Services::new(Arc::downgrade(self));
        let service = plan.provider.provide(&services)?;

        match plan.generation {
            Some(generation) if plan.lifetime.is_singleton() => {
                Ok(self.cache(key, generation, service))
            }
            _ => Ok(service),
        }
    }

    /// Caches a singleton unless its registration changed while the provider
    /// ran. If another resolution cached first, that instance wins.
    fn cache(&self, key: &ServiceKey, generation: u64, service: Service) -> Service {
        let mut state = self.state.lock();

        let current = state.registrations.get(key).map(|r| r.generation);
        if current != Some(generation) {
            debug!(key = %key, "Registration replaced during construction, not caching");
            return service;
        }

        state
            .singletons
            .entry(key.clone())
            .or_insert_with(|| {
                trace!(key = %key, "Cached singleton");
                service
            })
            .clone()
    }

    fn not_found(&self, key: &ServiceKey, state: &State) -> SlocError {
        let mut labels: Vec<&str> = state.registrations.keys().map(ServiceKey::label).collect();
        labels.sort_unstable();
        let suggestions = suggest_similar(key.label(), &labels, self.config.max_suggestions);

        debug!(key = %key, suggestions = suggestions.len(), "Service not registered");
        SlocError::KeyNotFound(KeyNotFoundError {
            requested: key.clone(),
            suggestions,
            self_construct_disabled: key.is_invokable() && !self.config.self_construct,
        })
    }
}

// ═══════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════

/// A service locator.
///
/// Owned by whoever creates it; it is not `Clone`. Factories and
/// injectable objects reach it through non-owning [`Services`] handles.
pub struct Registry {
    inner: Arc<Inner>,
}

impl Registry {
    /// An empty registry with default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State::default()),
                config,
            }),
        }
    }

    /// Create a new builder.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    // ── Registration ──

    /// Binds `key` to `provider`, replacing any earlier registration and
    /// dropping its cached singleton.
    ///
    /// With `allow_override` disabled, a second registration for the same
    /// key is ignored (and logged); use [`try_register`](Self::try_register)
    /// to observe the conflict.
    pub fn register(&self, key: impl Into<ServiceKey>, provider: Provider, singleton: bool) {
        if let Err(err) = self.try_register(key, provider, singleton) {
            warn!(error = %err, "Registration ignored");
        }
    }

    /// Like [`register`](Self::register) but fails instead of ignoring a
    /// conflicting registration when overrides are disabled.
    pub fn try_register(
        &self,
        key: impl Into<ServiceKey>,
        provider: Provider,
        singleton: bool,
    ) -> Result<()> {
        self.inner.insert(
            key.into(),
            provider,
            Lifetime::from(singleton),
            self.inner.config.allow_override,
        )
    }

    /// Registers a transient zero-argument factory.
    pub fn register_factory<T, F>(&self, key: impl Into<ServiceKey>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        self.register(key, Provider::factory(factory), false);
    }

    /// Registers a transient factory that receives the registry handle.
    pub fn register_with<T, F>(&self, key: impl Into<ServiceKey>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn(&Services) -> Result<T> + Send + Sync + 'static,
    {
        self.register(key, Provider::with_services(factory), false);
    }

    /// Registers a constant binding.
    pub fn register_literal<T: Any + Send + Sync>(&self, key: impl Into<ServiceKey>, value: T) {
        self.register(key, Provider::literal(value), false);
    }

    /// Registers `provider` as a singleton.
    pub fn register_singleton(&self, key: impl Into<ServiceKey>, provider: Provider) {
        self.register(key, provider, true);
    }

    /// Binds `key` to the constructor of `T`: resolving `key` builds a `T`.
    pub fn register_type<T: Construct>(&self, key: impl Into<ServiceKey>, singleton: bool) {
        self.register(key, Provider::construct::<T>(), singleton);
    }

    /// Removes the registration and cached singleton for `key`.
    ///
    /// Returns `true` if a registration existed.
    pub fn unregister(&self, key: impl Into<ServiceKey>) -> bool {
        let key = key.into();
        let mut state = self.inner.state.lock();
        state.singletons.remove(&key);
        let removed = state.registrations.remove(&key).is_some();
        debug!(key = %key, removed, "Unregistered service");
        removed
    }

    /// Applies a [`ServiceModule`].
    pub fn install(&self, module: &dyn ServiceModule) {
        info!(module = module.name(), "Installing module");
        module.register(self);
    }

    // ── Resolution ──

    /// Resolves `key` to a service.
    ///
    /// # Errors
    /// - [`SlocError::KeyNotFound`] if nothing is registered and the key
    ///   cannot construct itself
    /// - whatever the provider returned, unchanged
    pub fn resolve(&self, key: impl Into<ServiceKey>) -> Result<Service> {
        self.inner.resolve(&key.into())
    }

    /// Resolves `key` and downcasts the result to `T`.
    ///
    /// # Errors
    /// As [`resolve`](Self::resolve), plus [`SlocError::InvalidProvider`]
    /// when the provider produced something other than a `T`.
    pub fn resolve_as<T: Any + Send + Sync>(&self, key: impl Into<ServiceKey>) -> Result<Arc<T>> {
        let key = key.into();
        self.inner.resolve(&key)?.expect::<T>(&key)
    }

    /// Resolves `T` by type, constructing it when nothing is registered.
    ///
    /// ```rust
    /// use sloc_container::prelude::*;
    ///
    /// #[derive(Debug)]
    /// struct Clock;
    ///
    /// impl Construct for Clock {
    ///     fn construct(_: &Services) -> Result<Self> {
    ///         Ok(Clock)
    ///     }
    /// }
    ///
    /// let registry = Registry::new();
    /// let clock = registry.get::<Clock>().unwrap();
    /// ```
    pub fn get<T: Construct>(&self) -> Result<Arc<T>> {
        self.resolve_as::<T>(ServiceKey::constructible::<T>())
    }

    /// Bracket-style access: `registry.at(key).get()` is `registry.resolve(key)`.
    pub fn at(&self, key: impl Into<ServiceKey>) -> Lookup {
        self.services().at(key)
    }

    /// A non-owning handle to this registry.
    pub fn services(&self) -> Services {
        Services::new(Arc::downgrade(&self.inner))
    }

    // ── Introspection ──

    pub fn contains(&self, key: impl Into<ServiceKey>) -> bool {
        self.inner.state.lock().registrations.contains_key(&key.into())
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.inner.state.lock().registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.lock().registrations.is_empty()
    }

    /// Registered keys, sorted by label.
    pub fn keys(&self) -> Vec<ServiceKey> {
        let mut keys: Vec<_> = self.inner.state.lock().registrations.keys().cloned().collect();
        keys.sort_by(|a, b| a.label().cmp(b.label()));
        keys
    }

    /// Number of singletons materialized so far.
    pub fn cached_singletons(&self) -> usize {
        self.inner.state.lock().singletons.len()
    }

    /// Drops every cached singleton; registrations stay.
    pub fn clear_singletons(&self) {
        let mut state = self.inner.state.lock();
        debug!(cleared = state.singletons.len(), "Cleared singleton cache");
        state.singletons.clear();
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("Registry")
            .field("registered", &state.registrations.len())
            .field("singletons", &state.singletons.len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
