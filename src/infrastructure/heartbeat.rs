//! Instance Heartbeat
//!
//! Keeps ephemeral registrations alive by beating each registered instance
//! on a fixed interval until shutdown.

use crate::domain::entities::{RegistrationReport, ServiceInstance};
use crate::domain::ports::NamingClient;
use crate::infrastructure::shutdown::ShutdownController;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Heartbeat configuration.
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Interval between beats of each instance
    pub interval: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }
}

/// Periodic keepalive for registered instances.
pub struct InstanceHeartbeat {
    client: Arc<dyn NamingClient>,
    instances: Vec<ServiceInstance>,
    config: HeartbeatConfig,
}

impl InstanceHeartbeat {
    pub fn new(
        client: Arc<dyn NamingClient>,
        instances: Vec<ServiceInstance>,
        config: HeartbeatConfig,
    ) -> Self {
        Self {
            client,
            instances,
            config,
        }
    }

    /// Heartbeat everything a registration registered.
    pub fn from_report(report: &RegistrationReport, config: HeartbeatConfig) -> Self {
        Self::new(report.client.clone(), report.instances.clone(), config)
    }

    /// Beat every instance once. Returns the number of failed beats.
    pub async fn beat_once(&self) -> usize {
        let mut failures = 0;
        for instance in &self.instances {
            if let Err(e) = self.client.send_beat(instance).await {
                failures += 1;
                tracing::warn!(
                    "heartbeat failed for {} at {}: {}",
                    instance.name,
                    instance.endpoint,
                    e
                );
            }
        }
        failures
    }

    /// Start the heartbeat loop.
    ///
    /// The first beat is sent one interval after start, registration itself
    /// counting as the initial beat. The task ends once `shutdown` fires.
    pub fn spawn(self, shutdown: ShutdownController) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.config.interval);
            interval.tick().await;

            tracing::debug!(
                instances = self.instances.len(),
                interval_ms = self.config.interval.as_millis() as u64,
                "heartbeat started"
            );

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        self.beat_once().await;
                    }
                    _ = shutdown.wait() => {
                        tracing::debug!("heartbeat stopped");
                        break;
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::RegistryError;
    use crate::domain::value_objects::Endpoint;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    #[derive(Default)]
    struct CountingClient {
        beats: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl NamingClient for CountingClient {
        async fn register_instance(
            &self,
            _instance: &ServiceInstance,
        ) -> Result<(), RegistryError> {
            Ok(())
        }

        async fn send_beat(&self, _instance: &ServiceInstance) -> Result<(), RegistryError> {
            self.beats.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RegistryError::NoServers);
            }
            Ok(())
        }
    }

    fn instances() -> Vec<ServiceInstance> {
        vec![
            ServiceInstance::ephemeral("a", Endpoint::new("1.2.3.4", 10), 10.0, "DEFAULT"),
            ServiceInstance::ephemeral("b", Endpoint::new("1.2.3.4", 20), 10.0, "DEFAULT"),
        ]
    }

    #[test]
    fn test_default_interval() {
        assert_eq!(HeartbeatConfig::default().interval, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_beat_once_beats_every_instance() {
        let client = Arc::new(CountingClient::default());
        let heartbeat =
            InstanceHeartbeat::new(client.clone(), instances(), HeartbeatConfig::default());

        assert_eq!(heartbeat.beat_once().await, 0);
        assert_eq!(client.beats.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_beat_once_counts_failures() {
        let client = Arc::new(CountingClient {
            fail: true,
            ..Default::default()
        });
        let heartbeat =
            InstanceHeartbeat::new(client.clone(), instances(), HeartbeatConfig::default());

        assert_eq!(heartbeat.beat_once().await, 2);
        assert!(logs_contain("heartbeat failed for a"));
    }

    #[tokio::test]
    async fn test_spawn_beats_until_shutdown() {
        let client = Arc::new(CountingClient::default());
        let heartbeat = InstanceHeartbeat::new(
            client.clone(),
            instances(),
            HeartbeatConfig {
                interval: Duration::from_millis(20),
            },
        );
        let shutdown = ShutdownController::new();

        let handle = heartbeat.spawn(shutdown.clone());
        tokio::time::sleep(Duration::from_millis(150)).await;
        shutdown.shutdown();

        let joined = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(joined.is_ok(), "heartbeat did not stop");

        let beats = client.beats.load(Ordering::SeqCst);
        assert!(beats >= 2, "expected at least one round of beats, got {}", beats);

        // no beats after shutdown
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(client.beats.load(Ordering::SeqCst), beats);
    }

    #[tokio::test]
    async fn test_spawn_after_shutdown_exits() {
        let client = Arc::new(CountingClient::default());
        let heartbeat = InstanceHeartbeat::new(
            client.clone(),
            instances(),
            HeartbeatConfig {
                interval: Duration::from_secs(60),
            },
        );
        let shutdown = ShutdownController::new();
        shutdown.shutdown();

        let handle = heartbeat.spawn(shutdown);
        let joined = tokio::time::timeout(Duration::from_secs(1), handle).await;
        assert!(joined.is_ok());
        assert_eq!(client.beats.load(Ordering::SeqCst), 0);
    }
}
