mod registration_service;

pub use crate::domain::entities::RegistrationReport;
pub use registration_service::RegistrationService;
