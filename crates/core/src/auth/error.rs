use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("username and password are required")]
    MissingCredentials,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    TokenExpired,

    #[error("admin role required")]
    Forbidden,

    #[error("failed to issue token: {0}")]
    Issue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        assert_eq!(AuthError::MissingToken.to_string(), "missing bearer token");
        assert_eq!(
            AuthError::InvalidToken("bad signature".to_string()).to_string(),
            "invalid token: bad signature"
        );
        assert_eq!(AuthError::Forbidden.to_string(), "admin role required");
    }
}
