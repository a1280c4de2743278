//! System Interfaces Adapter
//!
//! Implements LocalAddressProvider by listing the host's network interfaces.

use crate::domain::ports::LocalAddressProvider;
use std::net::{IpAddr, Ipv4Addr};

/// Local address provider backed by the operating system's interface list.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterfaces;

impl SystemInterfaces {
    pub fn new() -> Self {
        Self
    }
}

impl LocalAddressProvider for SystemInterfaces {
    fn local_ipv4(&self) -> Option<Ipv4Addr> {
        match local_ip_address::list_afinet_netifas() {
            Ok(ifas) => first_non_loopback_ipv4(ifas.into_iter().map(|(_, ip)| ip)),
            Err(e) => {
                tracing::warn!("failed to list network interfaces: {}", e);
                None
            }
        }
    }
}

/// Pick the first IPv4 address that is not a loopback address.
fn first_non_loopback_ipv4(addrs: impl IntoIterator<Item = IpAddr>) -> Option<Ipv4Addr> {
    addrs.into_iter().find_map(|ip| match ip {
        IpAddr::V4(v4) if !v4.is_loopback() => Some(v4),
        _ => None,
    })
}
