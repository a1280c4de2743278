//! Address Resolver Service
//!
//! Turns configured `host:port` strings into endpoints.
//!
//! The literal host `127.0.0.1` is a marker meaning "this machine": it is
//! replaced by the first non-loopback IPv4 interface address and the
//! service's default port. Everything written after the marker is ignored,
//! so `127.0.0.1:9999` and a bare `127.0.0.1` both resolve to
//! `<local-ip>:26659` with default settings.

use crate::domain::errors::AddressError;
use crate::domain::ports::LocalAddressProvider;
use crate::domain::value_objects::Endpoint;
use std::sync::Arc;

/// Host that triggers local address substitution.
pub const LOOPBACK_MARKER: &str = "127.0.0.1";

/// Resolver for `host:port` strings.
#[derive(Clone)]
pub struct AddressResolver {
    local: Arc<dyn LocalAddressProvider>,
    default_port: u16,
}

impl AddressResolver {
    /// Create a resolver substituting `default_port` for loopback addresses.
    pub fn new(local: Arc<dyn LocalAddressProvider>, default_port: u16) -> Self {
        Self {
            local,
            default_port,
        }
    }

    /// Resolve an address of the form `host:port`.
    ///
    /// The host is the text before the first colon and is checked for the
    /// loopback marker before anything else. Other addresses need exactly one
    /// colon; more than one (raw IPv6 included) is malformed.
    pub fn resolve(&self, addr: &str) -> Result<Endpoint, AddressError> {
        let host = addr.split(':').next().unwrap_or_default();
        if host == LOOPBACK_MARKER {
            let ip = self
                .local
                .local_ipv4()
                .ok_or_else(|| AddressError::NoLocalAddress {
                    addr: addr.to_string(),
                })?;
            return Ok(Endpoint::new(ip.to_string(), self.default_port));
        }

        let (host, port) = addr.split_once(':').ok_or_else(|| AddressError::Malformed {
            addr: addr.to_string(),
        })?;

        if host.is_empty() || port.contains(':') {
            return Err(AddressError::Malformed {
                addr: addr.to_string(),
            });
        }

        let port = port.parse::<u16>().map_err(|source| AddressError::InvalidPort {
            addr: addr.to_string(),
            source,
        })?;

        Ok(Endpoint::new(host, port))
    }
}

impl std::fmt::Debug for AddressResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AddressResolver")
            .field("default_port", &self.default_port)
            .finish_non_exhaustive()
    }
}
