mod error;
mod functions;
mod traits;
mod types;

pub use error::AuthError;
pub use functions::{constant_time_eq, parse_bearer};
pub use traits::{Authenticator, Result};
pub use types::{LoginRequest, LoginResponse, Principal, Role};
