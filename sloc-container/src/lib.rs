//! Core registry implementation for the sloc service locator.

pub mod error;
pub mod instance;
pub mod key;
pub mod lifetime;
pub mod module;
pub mod provider;
pub mod registry;
pub mod services;

pub use error::{Result, SlocError};
pub use key::ServiceKey;
pub use registry::Registry;

pub mod prelude {
    pub use crate::error::{Result, SlocError};
    pub use crate::instance::Service;
    pub use crate::key::ServiceKey;
    pub use crate::lifetime::Lifetime;
    pub use crate::module::ServiceModule;
    pub use crate::provider::Provider;
    pub use crate::registry::{Registry, RegistryBuilder, RegistryConfig};
    pub use crate::services::{Construct, Injectable, Lookup, ServiceSlot, Services};
}
