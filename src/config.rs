use crate::domain::entities::RegistrationRequest;
use serde::Deserialize;
use std::time::Duration;

/// Environment variable that overrides the configured external address(es).
pub const EXTERNAL_LISTEN_ADDR_OVERRIDE: &str = "NACOS_EXTERNAL_LISTEN_ADDR";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Registry settings
    pub nacos_urls: String,
    pub nacos_namespace_id: String,
    pub nacos_application_name: String,
    pub nacos_external_listen_addr: String,
    pub heartbeat_enabled: bool,

    // Cache settings
    pub redis_url: Option<String>,

    // Logging
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nacos_urls: String::new(),
            nacos_namespace_id: String::new(),
            nacos_application_name: "proxyd".to_string(),
            nacos_external_listen_addr: "127.0.0.1:26659".to_string(),
            heartbeat_enabled: true,
            redis_url: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Build the registration request, or None when no registry is configured.
    pub fn registration_request(&self) -> Option<RegistrationRequest> {
        if self.nacos_urls.trim().is_empty() {
            return None;
        }
        Some(RegistrationRequest::new(
            self.nacos_urls.clone(),
            self.nacos_namespace_id.clone(),
            self.nacos_application_name.clone(),
            self.nacos_external_listen_addr.clone(),
        ))
    }
}

/// Defaults applied to every registration.
///
/// `default_port` is what a `127.0.0.1` address resolves to, whatever port
/// was written after it.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationSettings {
    /// Port substituted for loopback addresses
    pub default_port: u16,
    /// Timeout for every registry request
    pub request_timeout: Duration,
    /// Registry discovery poll interval
    pub listen_interval: Duration,
    /// Weight of every registered instance
    pub weight: f64,
    /// Registry cluster of every registered instance
    pub cluster: String,
    /// Value of the registration source metadata entry
    pub source_tag: String,
    /// Interval between heartbeats of ephemeral instances
    pub heartbeat_interval: Duration,
    /// Deadline for the cache liveness ping
    pub cache_ping_timeout: Duration,
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            default_port: 26659,
            request_timeout: Duration::from_millis(5000),
            listen_interval: Duration::from_millis(10000),
            weight: 10.0,
            cluster: "DEFAULT".to_string(),
            source_tag: "RUST".to_string(),
            heartbeat_interval: Duration::from_secs(5),
            cache_ping_timeout: Duration::from_secs(5),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown level: {0}")]
    UnknownLogLevel(String),
}

pub fn load_config() -> anyhow::Result<Config> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Load configuration through `lookup`, the environment in production.
pub fn load_config_from<F>(lookup: F) -> anyhow::Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = Config::default();

    let nacos_urls = lookup("PROXYD_NACOS_URLS").unwrap_or(defaults.nacos_urls);

    let nacos_namespace_id =
        lookup("PROXYD_NACOS_NAMESPACE_ID").unwrap_or(defaults.nacos_namespace_id);

    let nacos_application_name =
        lookup("PROXYD_NACOS_APPLICATION_NAME").unwrap_or(defaults.nacos_application_name);

    let configured_addr = lookup("PROXYD_NACOS_EXTERNAL_LISTEN_ADDR")
        .unwrap_or(defaults.nacos_external_listen_addr);
    let nacos_external_listen_addr =
        apply_external_addr_override(configured_addr, lookup(EXTERNAL_LISTEN_ADDR_OVERRIDE));

    let heartbeat_enabled = lookup("PROXYD_HEARTBEAT_ENABLED")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(defaults.heartbeat_enabled);

    let redis_url = lookup("PROXYD_REDIS_URL").filter(|v| !v.is_empty());

    let log_level = lookup("PROXYD_LOG_LEVEL").unwrap_or(defaults.log_level);

    Ok(Config {
        nacos_urls,
        nacos_namespace_id,
        nacos_application_name,
        nacos_external_listen_addr,
        heartbeat_enabled,
        redis_url,
        log_level,
    })
}

/// The override wins whenever it is set and non-empty.
pub fn apply_external_addr_override(configured: String, override_value: Option<String>) -> String {
    match override_value {
        Some(addr) if !addr.is_empty() => addr,
        _ => configured,
    }
}

/// Parse a log level name, ignoring case.
///
/// `crit` has no tracing counterpart and maps to ERROR.
pub fn parse_log_level(level: &str) -> Result<tracing::Level, ConfigError> {
    match level.to_lowercase().as_str() {
        "trace" | "trce" => Ok(tracing::Level::TRACE),
        "debug" | "dbug" => Ok(tracing::Level::DEBUG),
        "info" => Ok(tracing::Level::INFO),
        "warn" => Ok(tracing::Level::WARN),
        "error" | "eror" | "crit" => Ok(tracing::Level::ERROR),
        _ => Err(ConfigError::UnknownLogLevel(level.to_string())),
    }
}
