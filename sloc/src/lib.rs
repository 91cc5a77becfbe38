//! # sloc — a small service locator for Rust
//!
//! A [`Registry`] maps keys (types or names) to providers (factories or
//! literal values), optionally caching singletons. Objects it builds can
//! look up their own dependencies from the same registry.
//!
//! ```rust
//! use sloc::prelude::*;
//!
//! let registry = Registry::new();
//! registry.register("Hello", Provider::factory(|| Ok("World")), false);
//!
//! let world = registry.resolve_as::<&str>("Hello").unwrap();
//! assert_eq!(*world, "World");
//! ```

pub use sloc_container::*;
pub use sloc_support::*;
