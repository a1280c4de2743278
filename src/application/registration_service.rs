//! Registration Service - Main application use case
//!
//! Registers this process's service instances with the discovery registry.
//! It runs once at startup, before the proxy starts serving.

use crate::config::RegistrationSettings;
use crate::domain::entities::{
    RegistrationReport, RegistrationRequest, ServiceInstance, METADATA_REGISTERED_AT_KEY,
    METADATA_SOURCE_KEY,
};
use crate::domain::errors::{FatalConfigError, RegistrationError};
use crate::domain::ports::{NamingClientConfig, RegistryConnector};
use crate::domain::services::{AddressResolver, RegistryConfigBuilder};
use crate::domain::value_objects::{split_list, Endpoint};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Registration service - registers named instances with the registry.
///
/// One call to [`register`](Self::register):
/// 1. Resolves the registry servers
/// 2. Creates a naming client bound to the namespace
/// 3. Pairs service names with external addresses
/// 4. Checks all addresses share one host
/// 5. Registers each pair, stopping at the first failure
pub struct RegistrationService {
    settings: RegistrationSettings,
    resolver: AddressResolver,
    connector: Arc<dyn RegistryConnector>,
}

impl RegistrationService {
    /// Create a new registration service.
    pub fn new(
        settings: RegistrationSettings,
        resolver: AddressResolver,
        connector: Arc<dyn RegistryConnector>,
    ) -> Self {
        Self {
            settings,
            resolver,
            connector,
        }
    }

    /// Register every `(name, address)` pair of the request.
    ///
    /// Errors for which [`RegistrationError::is_fatal`] holds mean the
    /// deployment configuration is inconsistent and must be treated as
    /// terminal. Other errors leave the process running unregistered, or
    /// partially registered when a registry call fails midway; in that case
    /// [`RegistrationError::into_partial`] hands back what was registered.
    pub async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationReport, RegistrationError> {
        tracing::info!(
            urls = %request.registry_urls,
            namespace = %request.namespace,
            names = %request.names,
            external_addrs = %request.external_addrs,
            "start registry client"
        );

        // 1. Registry servers
        let servers = RegistryConfigBuilder::build(&self.resolver, &request.registry_urls)
            .map_err(|source| {
                tracing::error!(
                    "failed to resolve registry server urls {}: {}",
                    request.registry_urls,
                    source
                );
                RegistrationError::RegistryUrls {
                    urls: request.registry_urls.clone(),
                    source,
                }
            })?;

        // 2. Naming client
        let client = self
            .connector
            .connect(&servers, self.client_config(&request.namespace))
            .map_err(|e| {
                tracing::error!("failed to create registry client: {}", e);
                RegistrationError::Connect(e)
            })?;

        // 3. Names and addresses must pair up
        let names = split_list(&request.names);
        let addrs = split_list(&request.external_addrs);
        if names.len() != addrs.len() {
            let err = FatalConfigError::CountMismatch {
                names: names.len(),
                addrs: addrs.len(),
            };
            tracing::error!("{}", err);
            return Err(err.into());
        }

        // 4-5. Resolve every address and require a single host
        let endpoints = self.resolve_endpoints(&addrs)?;

        // 6-7. Register in order
        let registered_at = unix_seconds().to_string();
        let mut instances = Vec::with_capacity(endpoints.len());
        for (name, endpoint) in names.into_iter().zip(endpoints) {
            let instance = self.instance(name, endpoint, &registered_at);

            if let Err(source) = client.register_instance(&instance).await {
                tracing::error!(
                    "failed to register {} at {} in registry: {}",
                    instance.name,
                    instance.endpoint,
                    source
                );
                return Err(RegistrationError::Registry {
                    service: instance.name,
                    partial: RegistrationReport {
                        servers,
                        instances,
                        client,
                    },
                    source,
                });
            }

            tracing::debug!("registered {} at {}", instance.name, instance.endpoint);
            instances.push(instance);
        }

        // 8. Done
        tracing::info!(
            count = instances.len(),
            "register application instance in registry successfully"
        );

        Ok(RegistrationReport {
            servers,
            instances,
            client,
        })
    }

    fn client_config(&self, namespace: &str) -> NamingClientConfig {
        NamingClientConfig {
            namespace_id: namespace.to_string(),
            timeout: self.settings.request_timeout,
            listen_interval: self.settings.listen_interval,
            load_cache_at_start: false,
        }
    }

    /// Resolve all addresses before anything is registered.
    fn resolve_endpoints(&self, addrs: &[&str]) -> Result<Vec<Endpoint>, RegistrationError> {
        let mut endpoints: Vec<Endpoint> = Vec::with_capacity(addrs.len());

        for addr in addrs {
            let endpoint = self.resolver.resolve(addr).map_err(|e| {
                tracing::error!("failed to resolve external address {}: {}", addr, e);
                RegistrationError::ExternalAddress(e)
            })?;

            if let Some(first) = endpoints.first() {
                if first.host != endpoint.host {
                    let err = FatalConfigError::HostMismatch {
                        first: first.host.clone(),
                        other: endpoint.host,
                    };
                    tracing::error!("{}", err);
                    return Err(err.into());
                }
            }
            endpoints.push(endpoint);
        }

        Ok(endpoints)
    }

    fn instance(&self, name: &str, endpoint: Endpoint, registered_at: &str) -> ServiceInstance {
        ServiceInstance::ephemeral(
            name,
            endpoint,
            self.settings.weight,
            self.settings.cluster.as_str(),
        )
        .with_metadata(METADATA_SOURCE_KEY, self.settings.source_tag.as_str())
        .with_metadata(METADATA_REGISTERED_AT_KEY, registered_at)
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
