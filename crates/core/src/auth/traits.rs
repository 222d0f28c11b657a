use super::{AuthError, Principal};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Verifies and issues bearer tokens.
///
/// Token handling is pure CPU work, so the trait is synchronous.
pub trait Authenticator: Send + Sync {
    /// Verifies a bearer token and returns its principal.
    fn authenticate(&self, token: &str) -> Result<Principal>;

    /// Issues a signed token for a principal.
    fn issue(&self, principal: &Principal) -> Result<String>;
}
