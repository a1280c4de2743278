//! Domain Entities - Core business objects
//!
//! These entities describe what gets registered and where.

use crate::domain::ports::NamingClient;
use crate::domain::value_objects::Endpoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Metadata key identifying which client registered an instance.
pub const METADATA_SOURCE_KEY: &str = "preserved.register.source";

/// Metadata key carrying the Unix-second registration timestamp.
pub const METADATA_REGISTERED_AT_KEY: &str = "app_registry_tag";

/// One node of the discovery registry cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryServer {
    /// Address the registry node listens on
    pub address: Endpoint,
}

impl RegistryServer {
    pub fn new(address: Endpoint) -> Self {
        Self { address }
    }
}

/// A registerable unit: one service name bound to one network address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstance {
    /// Service name other systems look this process up by
    pub name: String,
    /// Address the service is reachable on
    pub endpoint: Endpoint,
    /// Relative weight for consumers doing weighted selection
    pub weight: f64,
    /// Registry cluster the instance belongs to
    pub cluster: String,
    /// Whether the instance accepts traffic
    pub enabled: bool,
    /// Health flag reported at registration time
    pub healthy: bool,
    /// Ephemeral instances disappear when heartbeats stop
    pub ephemeral: bool,
    /// Free-form metadata attached to the registration
    pub metadata: BTreeMap<String, String>,
}

impl ServiceInstance {
    /// Create an enabled, healthy, ephemeral instance with no metadata.
    pub fn ephemeral(
        name: impl Into<String>,
        endpoint: Endpoint,
        weight: f64,
        cluster: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            endpoint,
            weight,
            cluster: cluster.into(),
            enabled: true,
            healthy: true,
            ephemeral: true,
            metadata: BTreeMap::new(),
        }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Input of a registration attempt.
///
/// `names` and `external_addrs` are comma-separated and must have the
/// same number of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    /// Comma-separated registry `host:port` list
    pub registry_urls: String,
    /// Registry namespace shared by every server
    pub namespace: String,
    /// Comma-separated service names
    pub names: String,
    /// Comma-separated external `host:port` list
    pub external_addrs: String,
}

impl RegistrationRequest {
    pub fn new(
        registry_urls: impl Into<String>,
        namespace: impl Into<String>,
        names: impl Into<String>,
        external_addrs: impl Into<String>,
    ) -> Self {
        Self {
            registry_urls: registry_urls.into(),
            namespace: namespace.into(),
            names: names.into(),
            external_addrs: external_addrs.into(),
        }
    }
}

/// Instances registered through one naming client.
///
/// Returned on success, and carried by a registration that failed midway so
/// the caller can still heartbeat (or later deregister) what was registered.
#[derive(Clone)]
pub struct RegistrationReport {
    /// Registry nodes the client was configured with
    pub servers: Vec<RegistryServer>,
    /// Registered instances, in request order
    pub instances: Vec<ServiceInstance>,
    /// Client the instances were registered through
    pub client: Arc<dyn NamingClient>,
}

impl RegistrationReport {
    /// Host shared by every registered instance.
    pub fn host(&self) -> Option<&str> {
        self.instances.first().map(|i| i.endpoint.host.as_str())
    }
}

impl std::fmt::Debug for RegistrationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationReport")
            .field("servers", &self.servers)
            .field("instances", &self.instances)
            .finish_non_exhaustive()
    }
}
