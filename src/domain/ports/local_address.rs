//! Local Address Port
//!
//! Defines how the machine's own externally reachable address is discovered.

use std::net::Ipv4Addr;

/// Source of this machine's non-loopback IPv4 address.
///
/// This is an outbound port over the host's network interfaces.
/// Address resolution asks it whenever a configured address uses the
/// loopback marker `127.0.0.1`.
pub trait LocalAddressProvider: Send + Sync {
    /// Return the first non-loopback IPv4 interface address, if any.
    fn local_ipv4(&self) -> Option<Ipv4Addr>;
}
