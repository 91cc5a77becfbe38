//! Error types for sloc registry operations.
//!
//! Every failure surfaces synchronously to the caller of `resolve`. The
//! registry never retries and never wraps a provider's own error: whatever
//! a factory returns is handed back as is.

use std::fmt;

use sloc_support::rendering::{render_key_list, shorten_type_name};

use crate::key::ServiceKey;

/// Boxed error produced by user code inside a provider.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for all sloc operations.
#[derive(Debug, thiserror::Error)]
pub enum SlocError {
    /// Nothing is registered for the key and it cannot construct itself.
    #[error("{}", .0)]
    KeyNotFound(KeyNotFoundError),

    /// The provider bound to a key produced something the caller cannot use.
    #[error(
        "Invalid provider for {key}: expected {expected}, provider produced {produced}\n  \
         Hint: check what was registered under {key}"
    )]
    InvalidProvider {
        key: ServiceKey,
        expected: &'static str,
        produced: &'static str,
    },

    /// A provider failed while producing its instance.
    #[error(transparent)]
    ProviderFailure(BoxError),

    /// `try_register` found an existing registration, or the builder saw a
    /// duplicate while overrides are disabled.
    #[error("{}", .0)]
    AlreadyRegistered(AlreadyRegisteredError),

    /// A [`Services`](crate::services::Services) handle outlived its registry.
    #[error("The registry behind this services handle has been dropped")]
    RegistryDropped,

    /// An injectable instance was never bound to a registry.
    #[error(
        "{} has no services: it was not produced by a registry\n  \
         Hint: resolve it through the registry instead of building it directly",
        shorten_type_name(.type_name)
    )]
    NotInjected { type_name: &'static str },
}

impl SlocError {
    /// Wraps a failure raised by user code inside a provider.
    ///
    /// ```
    /// use sloc_container::error::SlocError;
    ///
    /// let err = SlocError::provider_failure("connection refused");
    /// assert_eq!(err.to_string(), "connection refused");
    /// ```
    pub fn provider_failure(err: impl Into<BoxError>) -> Self {
        SlocError::ProviderFailure(err.into())
    }

    /// Returns the provider's own error if it is an `E`.
    pub fn provider_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            SlocError::ProviderFailure(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Returns `true` for [`SlocError::KeyNotFound`].
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, SlocError::KeyNotFound(_))
    }
}

/// Error when a key has no registration.
///
/// Includes "did you mean?" suggestions from the keys that are registered.
#[derive(Debug)]
pub struct KeyNotFoundError {
    /// The key that was requested
    pub requested: ServiceKey,
    /// Similar keys that ARE registered
    pub suggestions: Vec<String>,
    /// The key could construct itself but self-construction is disabled
    pub self_construct_disabled: bool,
}

impl fmt::Display for KeyNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service not registered: {}", self.requested)?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:{}", render_key_list(&self.suggestions))?;
        }

        if self.self_construct_disabled {
            return write!(
                f,
                "\n  Hint: {} can construct itself, but self-construction is disabled for this registry",
                shorten_type_name(self.requested.label())
            );
        }

        match self.requested.name() {
            Some(name) => write!(f, "\n  Hint: Did you forget to call .register({name:?}, ...)?"),
            None => write!(
                f,
                "\n  Hint: Register a provider for {0}, or implement Construct for it and use .get::<{0}>()",
                shorten_type_name(self.requested.label())
            ),
        }
    }
}

/// Error when a key is registered twice and overriding is not allowed.
#[derive(Debug)]
pub struct AlreadyRegisteredError {
    pub key: ServiceKey,
}

impl fmt::Display for AlreadyRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service already registered: {}", self.key)?;
        write!(
            f,
            "\n  Hint: Use .register() to replace it, or enable allow_override on the builder"
        )
    }
}

/// Convenient Result type for sloc operations.
pub type Result<T> = std::result::Result<T, SlocError>;
