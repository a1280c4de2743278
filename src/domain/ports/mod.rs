mod local_address;
mod naming_client;

pub use local_address::LocalAddressProvider;
pub use naming_client::{NamingClient, NamingClientConfig, RegistryConnector};
