//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};

/// A resolved network endpoint.
///
/// The host is never empty and the port is always a valid network port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// IP address or hostname
    pub host: String,
    /// Port number
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Split a comma-separated configuration value into its entries.
///
/// Entries are not trimmed or filtered, so `"a,,b"` yields three entries.
pub fn split_list(value: &str) -> Vec<&str> {
    value.split(',').collect()
}
