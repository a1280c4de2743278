//! Registry Config Builder
//!
//! Builds the list of registry servers from a comma-separated URL list.

use crate::domain::entities::RegistryServer;
use crate::domain::errors::AddressError;
use crate::domain::services::AddressResolver;
use crate::domain::value_objects::split_list;

/// Builder for registry server descriptors.
pub struct RegistryConfigBuilder;

impl RegistryConfigBuilder {
    /// Resolve every entry of `urls` into a registry server.
    ///
    /// Output order matches input order and duplicates are kept. The first
    /// entry that fails to resolve aborts the build.
    pub fn build(
        resolver: &AddressResolver,
        urls: &str,
    ) -> Result<Vec<RegistryServer>, AddressError> {
        split_list(urls)
            .into_iter()
            .map(|url| resolver.resolve(url).map(RegistryServer::new))
            .collect()
    }
}
