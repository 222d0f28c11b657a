//! Token authentication for the HTTP surface.

mod extractors;
mod jwt;

pub use extractors::{AdminUser, AuthState};
pub use jwt::{JwtAuthenticator, DEFAULT_TOKEN_TTL};
