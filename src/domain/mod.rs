//! Domain Layer
//!
//! Entities, value objects, errors, ports and pure services.
//! Nothing in here performs I/O.

pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{RegistrationReport, RegistrationRequest, RegistryServer, ServiceInstance};
pub use errors::{AddressError, FatalConfigError, RegistrationError, RegistryError};
pub use value_objects::Endpoint;
