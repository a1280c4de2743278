mod address_resolver;
mod registry_config;

pub use address_resolver::{AddressResolver, LOOPBACK_MARKER};
pub use registry_config::RegistryConfigBuilder;
