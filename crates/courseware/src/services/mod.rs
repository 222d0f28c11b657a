//! Application services sitting between the HTTP handlers and storage.

mod auth;
mod catalog;
mod enrollment;
mod error;

pub use auth::{AdminCredentials, AuthService};
pub use catalog::CatalogService;
pub use enrollment::EnrollmentService;
pub use error::{Result, ServiceError};
