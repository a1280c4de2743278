//! proxyd-discovery Library
//!
//! Startup-time service registration for the proxy: resolves the process's
//! external endpoints, registers them with a Nacos registry and provides
//! the Redis client factory used by the rest of the proxy.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use adapters::outbound::{
    check_connection, CacheConnection, CacheError, NacosConnector, SystemInterfaces,
};
pub use application::{RegistrationReport, RegistrationService};
pub use config::{load_config, Config, RegistrationSettings};
pub use domain::entities::{RegistrationRequest, RegistryServer, ServiceInstance};
pub use domain::errors::{AddressError, FatalConfigError, RegistrationError, RegistryError};
pub use domain::ports::{LocalAddressProvider, NamingClient, NamingClientConfig, RegistryConnector};
pub use domain::services::{AddressResolver, RegistryConfigBuilder};
pub use domain::value_objects::Endpoint;
pub use infrastructure::{HeartbeatConfig, InstanceHeartbeat, ShutdownController};
