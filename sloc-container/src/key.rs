//! Service identification keys.
//!
//! A [`ServiceKey`] is either a Rust type (its [`TypeId`]) or a free-form
//! name such as `"Hello"`. Type keys built with
//! [`ServiceKey::constructible`] also carry the type's own constructor,
//! which lets the registry build the type when nothing was registered for it.

use std::any::{TypeId, type_name};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::Result;
use crate::instance::Service;
use crate::services::{Construct, Services, construct_service};

/// Builds a type from a registry handle; the default provider of a type key.
pub type Constructor = fn(&Services) -> Result<Service>;

#[derive(Clone)]
enum KeyId {
    Type {
        id: TypeId,
        type_name: &'static str,
    },
    Named(Cow<'static, str>),
}

/// Uniquely identifies a service within a registry.
///
/// Equality and hashing only look at the identity (the [`TypeId`] or the
/// name). Whether the key carries a constructor never affects lookups, so
/// `ServiceKey::of::<T>()` and `ServiceKey::constructible::<T>()` address
/// the same registration.
///
/// # Examples
/// ```
/// use sloc_container::key::ServiceKey;
///
/// let by_type = ServiceKey::of::<String>();
/// assert_eq!(by_type.label(), "alloc::string::String");
///
/// let by_name = ServiceKey::named("Hello");
/// assert_eq!(by_name.name(), Some("Hello"));
/// assert_eq!(by_name, ServiceKey::from("Hello"));
/// ```
#[derive(Clone)]
pub struct ServiceKey {
    id: KeyId,
    constructor: Option<Constructor>,
}

impl ServiceKey {
    /// Creates a key for type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: KeyId::Type {
                id: TypeId::of::<T>(),
                type_name: type_name::<T>(),
            },
            constructor: None,
        }
    }

    /// Creates a key for type `T` that can act as its own provider.
    ///
    /// Resolving this key without a registration constructs a fresh `T`
    /// through [`Construct::construct`].
    #[inline]
    pub fn constructible<T: Construct>() -> Self {
        Self {
            constructor: Some(construct_service::<T> as Constructor),
            ..Self::of::<T>()
        }
    }

    /// Creates a key identified by an arbitrary name.
    #[inline]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: KeyId::Named(name.into()),
            constructor: None,
        }
    }

    /// Returns the [`TypeId`] for type keys.
    pub fn type_id(&self) -> Option<TypeId> {
        match self.id {
            KeyId::Type { id, .. } => Some(id),
            KeyId::Named(_) => None,
        }
    }

    /// Returns the name for named keys.
    pub fn name(&self) -> Option<&str> {
        match &self.id {
            KeyId::Type { .. } => None,
            KeyId::Named(name) => Some(name.as_ref()),
        }
    }

    /// Human-readable label: the full type name or the key name.
    pub fn label(&self) -> &str {
        match &self.id {
            KeyId::Type { type_name, .. } => *type_name,
            KeyId::Named(name) => name.as_ref(),
        }
    }

    /// Returns `true` if this key can serve as its own provider.
    #[inline]
    pub fn is_invokable(&self) -> bool {
        self.constructor.is_some()
    }

    pub(crate) fn constructor(&self) -> Option<Constructor> {
        self.constructor
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        match (&self.id, &other.id) {
            (KeyId::Type { id: a, .. }, KeyId::Type { id: b, .. }) => a == b,
            (KeyId::Named(a), KeyId::Named(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.id {
            KeyId::Type { id, .. } => {
                0u8.hash(state);
                id.hash(state);
            }
            KeyId::Named(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}

impl From<&'static str> for ServiceKey {
    fn from(name: &'static str) -> Self {
        Self::named(name)
    }
}

impl From<String> for ServiceKey {
    fn from(name: String) -> Self {
        Self::named(name)
    }
}

impl From<&ServiceKey> for ServiceKey {
    fn from(key: &ServiceKey) -> Self {
        key.clone()
    }
}

impl fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            KeyId::Type { type_name, .. } => write!(f, "ServiceKey({type_name})"),
            KeyId::Named(name) => write!(f, "ServiceKey({name:?})"),
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            KeyId::Type { type_name, .. } => f.write_str(type_name),
            KeyId::Named(name) => write!(f, "{name:?}"),
        }
    }
}
