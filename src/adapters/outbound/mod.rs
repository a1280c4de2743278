mod nacos_naming_client;
mod redis_cache;
mod system_interfaces;

pub use nacos_naming_client::{
    NacosConnector, NacosNamingClient, DEFAULT_CONTEXT_PATH, DEFAULT_GROUP,
};
pub use redis_cache::{
    check_connection, new_cluster_client, new_single_client, CacheConnection, CacheError,
    DEFAULT_PING_TIMEOUT,
};
pub use system_interfaces::SystemInterfaces;
