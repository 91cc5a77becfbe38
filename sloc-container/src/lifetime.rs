//! Service lifetimes.
//!
//! - [`Lifetime::Transient`] — the provider runs on every resolve
//! - [`Lifetime::Singleton`] — the first result is cached for the life of
//!   the registry, or until the key is registered again
use std::fmt;

/// How long a resolved service is reused.
///
/// # Examples
/// ```
/// use sloc_container::lifetime::Lifetime;
///
/// assert_eq!(Lifetime::from(true), Lifetime::Singleton);
/// assert_eq!(Lifetime::default(), Lifetime::Transient);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
    /// New instance on every resolve call.
    #[default]
    Transient,

    /// One instance per registry, created lazily on first resolve.
    Singleton,
}

impl Lifetime {
    /// Returns `true` if resolved instances are cached.
    #[inline]
    pub fn is_singleton(&self) -> bool {
        matches!(self, Lifetime::Singleton)
    }
}

impl From<bool> for Lifetime {
    fn from(singleton: bool) -> Self {
        if singleton {
            Lifetime::Singleton
        } else {
            Lifetime::Transient
        }
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Transient => write!(f, "Transient"),
            Lifetime::Singleton => write!(f, "Singleton"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifetime_from_flag() {
        assert!(Lifetime::from(true).is_singleton());
        assert!(!Lifetime::from(false).is_singleton());
    }

    #[test]
    fn lifetime_display() {
        assert_eq!(format!("{}", Lifetime::Singleton), "Singleton");
        assert_eq!(format!("{}", Lifetime::Transient), "Transient");
    }
}
