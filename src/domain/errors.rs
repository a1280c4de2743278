//! Domain Errors
//!
//! Error types for address resolution, registry calls and the
//! registration flow. Each error carries the input that failed.

use crate::domain::entities::RegistrationReport;
use std::num::ParseIntError;

/// Failure to turn a `host:port` string into an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("malformed address {addr:?}: expected host:port")]
    Malformed { addr: String },

    #[error("invalid port in address {addr:?}: {source}")]
    InvalidPort {
        addr: String,
        #[source]
        source: ParseIntError,
    },

    #[error("no non-loopback IPv4 address found for {addr:?}")]
    NoLocalAddress { addr: String },
}

/// Failure talking to the discovery registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to create registry client: {0}")]
    Client(String),

    #[error("no registry servers configured")]
    NoServers,

    #[error("registry request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("registry {url} rejected request: {status} - {body}")]
    Rejected {
        url: String,
        status: u16,
        body: String,
    },
}

/// Deployment configuration defects that must stop registration.
///
/// Callers are required to treat these as terminal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FatalConfigError {
    #[error("number of application names ({names}) not equal to number of external addresses ({addrs})")]
    CountMismatch { names: usize, addrs: usize },

    #[error("external addresses resolve to different hosts: {first} and {other}")]
    HostMismatch { first: String, other: String },
}

/// Outcome of a failed registration attempt.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("failed to resolve registry urls {urls:?}: {source}")]
    RegistryUrls {
        urls: String,
        #[source]
        source: AddressError,
    },

    #[error("failed to resolve external address: {0}")]
    ExternalAddress(#[source] AddressError),

    #[error("failed to create registry client: {0}")]
    Connect(#[source] RegistryError),

    #[error(
        "failed to register {service} ({} instance(s) already registered): {source}",
        .partial.instances.len()
    )]
    Registry {
        service: String,
        /// Instances registered before the failure; they stay registered
        partial: RegistrationReport,
        #[source]
        source: RegistryError,
    },

    #[error("fatal configuration error: {0}")]
    Fatal(#[from] FatalConfigError),
}

impl RegistrationError {
    /// Whether this error signals a deployment configuration defect.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// Instances registered before a midway registry failure.
    ///
    /// `None` for every other error, and when nothing was registered yet.
    pub fn into_partial(self) -> Option<RegistrationReport> {
        match self {
            Self::Registry { partial, .. } if !partial.instances.is_empty() => Some(partial),
            _ => None,
        }
    }
}
