//! proxyd-discovery - service registration for the proxy process
//!
//! This is the composition root that wires together all the components.
//! It registers once at startup, keeps the registration alive and waits
//! for a termination signal.

use proxyd_discovery::adapters::outbound::{check_connection, CacheConnection};
use proxyd_discovery::config::{load_config, parse_log_level, RegistrationSettings};
use proxyd_discovery::infrastructure::shutdown_signal;
use proxyd_discovery::{
    AddressResolver, HeartbeatConfig, InstanceHeartbeat, NacosConnector, RegistrationService,
    ShutdownController, SystemInterfaces,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let level = parse_log_level(&cfg.log_level);
    tracing_subscriber::fmt()
        .with_max_level(*level.as_ref().unwrap_or(&tracing::Level::INFO))
        .init();
    if let Err(e) = level {
        tracing::warn!("invalid log_level set: {}", e);
    }

    tracing::info!("starting proxyd-discovery version={}", env!("CARGO_PKG_VERSION"));

    let settings = RegistrationSettings::default();
    let shutdown = ShutdownController::new();

    // ===== REGISTRATION =====
    let mut heartbeat = None;
    match cfg.registration_request() {
        Some(request) => {
            let resolver =
                AddressResolver::new(Arc::new(SystemInterfaces::new()), settings.default_port);
            let service = RegistrationService::new(
                settings.clone(),
                resolver,
                Arc::new(NacosConnector::new()),
            );

            let registered = match service.register(&request).await {
                Ok(report) => Some(report),
                Err(e) if e.is_fatal() => {
                    return Err(anyhow::Error::new(e)
                        .context("refusing to start with inconsistent registry configuration"));
                }
                Err(e) => {
                    tracing::warn!("continuing with incomplete registry registration: {}", e);
                    // Instances registered before the failure stay registered
                    e.into_partial()
                }
            };

            if let Some(report) = registered.filter(|_| cfg.heartbeat_enabled) {
                let config = HeartbeatConfig {
                    interval: settings.heartbeat_interval,
                };
                heartbeat =
                    Some(InstanceHeartbeat::from_report(&report, config).spawn(shutdown.clone()));
            }
        }
        None => {
            tracing::info!("no registry urls configured, skipping registration");
        }
    }

    // ===== CACHE =====
    let _cache = match cfg.redis_url.as_deref() {
        Some(url) => open_cache(url, settings.cache_ping_timeout).await,
        None => None,
    };

    shutdown_signal(shutdown.clone()).await;

    if let Some(handle) = heartbeat {
        if let Err(e) = handle.await {
            tracing::error!("heartbeat task failed: {}", e);
        }
    }

    Ok(())
}

/// Open the cache and verify it answers. A failed check is logged and the
/// connection kept, so the proxy runs degraded rather than not at all.
async fn open_cache(url: &str, timeout: Duration) -> Option<CacheConnection> {
    let conn = match CacheConnection::open(url) {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!("failed to create redis client: {}", e);
            return None;
        }
    };

    match check_connection(&conn, timeout).await {
        Ok(()) => tracing::info!(cluster = conn.is_cluster(), "redis connection verified"),
        Err(e) => tracing::error!(cluster = conn.is_cluster(), "{}", e),
    }

    Some(conn)
}
