//! Naming Client Port
//!
//! Defines the interface to the service-discovery registry.
//! Implementations may speak the Nacos HTTP API or keep instances in memory.

use crate::domain::entities::{RegistryServer, ServiceInstance};
use crate::domain::errors::RegistryError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Client-side settings for a registry connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingClientConfig {
    /// Namespace shared by every configured server
    pub namespace_id: String,
    /// Timeout applied to every registry request
    pub timeout: Duration,
    /// Interval between discovery polls
    pub listen_interval: Duration,
    /// Whether previously cached discovery state is loaded on startup
    pub load_cache_at_start: bool,
}

/// A client bound to one registry namespace.
#[async_trait]
pub trait NamingClient: Send + Sync {
    /// Register a single service instance.
    async fn register_instance(&self, instance: &ServiceInstance) -> Result<(), RegistryError>;

    /// Refresh the lease of an ephemeral instance.
    async fn send_beat(&self, instance: &ServiceInstance) -> Result<(), RegistryError>;
}

/// Factory for naming clients.
///
/// Creating a client does not perform network I/O. The returned client may
/// be kept by the caller after registration.
pub trait RegistryConnector: Send + Sync {
    fn connect(
        &self,
        servers: &[RegistryServer],
        config: NamingClientConfig,
    ) -> Result<Arc<dyn NamingClient>, RegistryError>;
}
