//! Service modules — groups of related registrations.
//!
//! # Examples
//! ```rust
//! use sloc_container::prelude::*;
//!
//! struct StorageModule;
//!
//! impl ServiceModule for StorageModule {
//!     fn register(&self, registry: &Registry) {
//!         registry.register_literal("database_url", "postgres://localhost");
//!         registry.register_factory("pool_size", || Ok(16usize));
//!     }
//! }
//!
//! let registry = Registry::new();
//! registry.install(&StorageModule);
//! assert!(registry.contains("pool_size"));
//! ```

/// A module that registers related services into a registry.
///
/// Split registrations by concern instead of one long setup block:
///
/// ```rust,ignore
/// registry.install(&StorageModule);
/// registry.install(&MailModule);
/// ```
pub trait ServiceModule {
    /// Register services into `registry`.
    fn register(&self, registry: &crate::registry::Registry);

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use crate::registry::Registry;

    struct GreetingModule {
        greeting: &'static str,
    }

    impl ServiceModule for GreetingModule {
        fn register(&self, registry: &Registry) {
            registry.register_literal("greeting", self.greeting);
            registry.register("shout", Provider::factory(|| Ok(String::from("HEY"))), true);
        }
    }

    #[test]
    fn module_registers_services() {
        let registry = Registry::new();
        registry.install(&GreetingModule { greeting: "hi" });

        assert_eq!(registry.len(), 2);
        assert_eq!(*registry.resolve_as::<&str>("greeting").unwrap(), "hi");
    }

    #[test]
    fn later_module_overrides_earlier() {
        let registry = Registry::new();
        registry.install(&GreetingModule { greeting: "hi" });
        registry.install(&GreetingModule { greeting: "hello" });

        assert_eq!(*registry.resolve_as::<&str>("greeting").unwrap(), "hello");
    }

    #[test]
    fn module_has_name() {
        let module = GreetingModule { greeting: "hi" };
        assert!(module.name().contains("GreetingModule"));
    }
}
