//! Nacos Naming Client
//!
//! Implements NamingClient against the Nacos v1 open API over HTTP.
//!
//! Servers are tried in the configured order. A transport failure moves on
//! to the next server; an HTTP error answer is returned as is. Each server
//! gets one attempt per call.
//!
//! See: https://nacos.io/docs/latest/manual/user/open-api/

use crate::domain::entities::{RegistryServer, ServiceInstance};
use crate::domain::errors::RegistryError;
use crate::domain::ports::{NamingClient, NamingClientConfig, RegistryConnector};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Default HTTP context path of a Nacos server.
pub const DEFAULT_CONTEXT_PATH: &str = "/nacos";

/// Group every instance is registered under.
pub const DEFAULT_GROUP: &str = "DEFAULT_GROUP";

const INSTANCE_PATH: &str = "/v1/ns/instance";
const BEAT_PATH: &str = "/v1/ns/instance/beat";

/// Answer of the first registry server that responded.
struct RegistryAnswer {
    url: String,
    status: u16,
    body: String,
}

/// Heartbeat payload expected by `/v1/ns/instance/beat`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BeatInfo<'a> {
    service_name: String,
    ip: &'a str,
    port: u16,
    cluster: &'a str,
    weight: f64,
    metadata: &'a BTreeMap<String, String>,
    scheduled: bool,
}

/// Connector producing [`NacosNamingClient`]s.
#[derive(Debug, Clone)]
pub struct NacosConnector {
    context_path: String,
}

impl NacosConnector {
    pub fn new() -> Self {
        Self {
            context_path: DEFAULT_CONTEXT_PATH.to_string(),
        }
    }

    /// Use a non-default HTTP context path (e.g. behind a gateway).
    pub fn with_context_path(mut self, context_path: impl Into<String>) -> Self {
        self.context_path = context_path.into();
        self
    }
}

impl Default for NacosConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryConnector for NacosConnector {
    fn connect(
        &self,
        servers: &[RegistryServer],
        config: NamingClientConfig,
    ) -> Result<Arc<dyn NamingClient>, RegistryError> {
        let client = NacosNamingClient::new(servers, &self.context_path, config)?;
        Ok(Arc::new(client))
    }
}

/// HTTP client for one Nacos namespace.
pub struct NacosNamingClient {
    client: reqwest::Client,
    base_urls: Vec<String>,
    config: NamingClientConfig,
}

impl NacosNamingClient {
    /// Create a client for `servers`. No request is sent.
    pub fn new(
        servers: &[RegistryServer],
        context_path: &str,
        config: NamingClientConfig,
    ) -> Result<Self, RegistryError> {
        if servers.is_empty() {
            return Err(RegistryError::NoServers);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RegistryError::Client(e.to_string()))?;

        let context_path = context_path.trim_end_matches('/');
        let base_urls = servers
            .iter()
            .map(|s| format!("http://{}{}", s.address, context_path))
            .collect();

        Ok(Self {
            client,
            base_urls,
            config,
        })
    }

    /// Base URLs requests are sent to, in failover order.
    pub fn base_urls(&self) -> &[String] {
        &self.base_urls
    }

    fn grouped_name(name: &str) -> String {
        format!("{}@@{}", DEFAULT_GROUP, name)
    }

    fn register_form(
        &self,
        instance: &ServiceInstance,
    ) -> Result<Vec<(&'static str, String)>, RegistryError> {
        let metadata = serde_json::to_string(&instance.metadata)
            .map_err(|e| RegistryError::Client(format!("failed to encode metadata: {}", e)))?;

        Ok(vec![
            ("namespaceId", self.config.namespace_id.clone()),
            ("serviceName", Self::grouped_name(&instance.name)),
            ("groupName", DEFAULT_GROUP.to_string()),
            ("clusterName", instance.cluster.clone()),
            ("ip", instance.endpoint.host.clone()),
            ("port", instance.endpoint.port.to_string()),
            ("weight", instance.weight.to_string()),
            ("enable", instance.enabled.to_string()),
            ("healthy", instance.healthy.to_string()),
            ("ephemeral", instance.ephemeral.to_string()),
            ("metadata", metadata),
        ])
    }

    fn beat_form(
        &self,
        instance: &ServiceInstance,
    ) -> Result<Vec<(&'static str, String)>, RegistryError> {
        let beat = BeatInfo {
            service_name: Self::grouped_name(&instance.name),
            ip: &instance.endpoint.host,
            port: instance.endpoint.port,
            cluster: &instance.cluster,
            weight: instance.weight,
            metadata: &instance.metadata,
            scheduled: false,
        };
        let beat = serde_json::to_string(&beat)
            .map_err(|e| RegistryError::Client(format!("failed to encode beat: {}", e)))?;

        Ok(vec![
            ("namespaceId", self.config.namespace_id.clone()),
            ("serviceName", Self::grouped_name(&instance.name)),
            ("groupName", DEFAULT_GROUP.to_string()),
            ("ephemeral", instance.ephemeral.to_string()),
            ("beat", beat),
        ])
    }

    /// Send a form request to each server in turn until one answers.
    async fn send_form(
        &self,
        method: reqwest::Method,
        path: &str,
        form: &[(&'static str, String)],
    ) -> Result<RegistryAnswer, RegistryError> {
        let mut last_err = RegistryError::NoServers;

        for base in &self.base_urls {
            let url = format!("{}{}", base, path);
            let response = match self
                .client
                .request(method.clone(), &url)
                .form(form)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    tracing::debug!("registry server {} unreachable: {}", url, e);
                    last_err = RegistryError::Transport {
                        url,
                        message: e.to_string(),
                    };
                    continue;
                }
            };

            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if !status.is_success() {
                return Err(RegistryError::Rejected {
                    url,
                    status: status.as_u16(),
                    body,
                });
            }
            return Ok(RegistryAnswer {
                url,
                status: status.as_u16(),
                body,
            });
        }

        Err(last_err)
    }
}

#[async_trait]
impl NamingClient for NacosNamingClient {
    async fn register_instance(&self, instance: &ServiceInstance) -> Result<(), RegistryError> {
        let form = self.register_form(instance)?;
        let answer = self
            .send_form(reqwest::Method::POST, INSTANCE_PATH, &form)
            .await?;

        if answer.body.trim() != "ok" {
            return Err(RegistryError::Rejected {
                url: answer.url,
                status: answer.status,
                body: answer.body,
            });
        }
        Ok(())
    }

    async fn send_beat(&self, instance: &ServiceInstance) -> Result<(), RegistryError> {
        let form = self.beat_form(instance)?;
        self.send_form(reqwest::Method::PUT, BEAT_PATH, &form)
            .await
            .map(|_| ())
    }
}
