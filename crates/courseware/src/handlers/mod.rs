pub mod admin;
pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod error;
pub mod health;

pub use error::AppError;
